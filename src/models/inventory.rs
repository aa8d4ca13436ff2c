// src/models/inventory.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Catálogo de produtos acabados (non, pão de forma). Preço aqui é o que será
// travado nos itens de pedido no momento da criação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub low_stock_threshold: Decimal,
    pub created_at: DateTime<Utc>,
}

// Uma compra aumenta o estoque do ingrediente e baixa o caixa uma única vez.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
}

// Quanto de `ingredient` é preciso para produzir um meshok de `product`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecipe {
    pub id: Uuid,
    pub product_id: Uuid,
    pub ingredient_id: Uuid,
    pub amount_per_meshok: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: Uuid,
    pub product_id: Uuid,
    pub meshok: Decimal,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
}

// Registro do consumo real de cada ingrediente por produção.
// Permite reverter exatamente o que foi baixado ao excluir a produção.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductionIngredientUsage {
    pub id: Uuid,
    pub production_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity_used: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BakeryProductStock {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub updated_at: DateTime<Utc>,
}

// Produção diária de produto acabado. Depois de `confirmed = true` o
// registro é imutável — edição e exclusão são rejeitadas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyBakeryProduction {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub production_date: NaiveDate,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "revision_target", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevisionTarget {
    Ingredient,
    ProductStock,
}

// Trilha de auditoria de correções manuais de estoque. Somente inserção,
// nunca alterada ou excluída.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRevisionReport {
    pub id: Uuid,
    pub target: RevisionTarget,
    pub target_id: Uuid,
    pub old_quantity: Decimal,
    pub new_quantity: Decimal,
    pub actor: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
