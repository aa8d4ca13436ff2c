// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Collection,
    Repayment,
    Other,
}

// Recibo financeiro. Coletas de pedido têm `order_id` preenchido e são
// únicas por pedido (chave do upsert); quitações de dívida e coletas
// avulsas ficam sem pedido.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub shop_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
}

// Histórico de quitação de dívida. O efeito de caixa vive no Payment
// pareado — esta linha nunca conta duas vezes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoanRepayment {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

// Singleton: caixa atual da padaria. Exatamente uma linha (id = 1),
// mutada apenas via ajuste incremental sob lock.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BakeryBalance {
    pub id: i32,
    pub amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

// Resultado da auditoria: valor corrente vs. recomputação do histórico.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAudit {
    pub recorded: Decimal,
    pub resynced: Decimal,
    pub drift: Decimal,
}
