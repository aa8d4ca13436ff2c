// src/models/shops.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// Ponto de venda que recebe entregas e carrega uma dívida (loan_balance).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: Uuid,
    pub region_id: Uuid,
    pub name: String,
    pub owner_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,

    // Dívida pendente. Invariante: nunca negativa — só o caminho de
    // reconciliação escreve aqui.
    pub loan_balance: Decimal,
    pub created_at: DateTime<Utc>,
}
