// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

// Contagem de pedidos de hoje por status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub today_orders: i64,
    pub pending: i64,
    pub partial: i64,
    pub delivered: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShopLoanEntry {
    pub shop_id: Uuid,
    pub shop_name: String,
    pub loan_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
}

// Fotografia financeira para o painel: caixa, dívidas por loja e estoque.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub bakery_balance: Decimal,
    pub total_loan: Decimal,
    pub shop_loans: Vec<ShopLoanEntry>,
    pub stock_levels: Vec<StockLevelEntry>,
    pub received_today: Decimal,
    pub purchases_today: Decimal,
    pub stats: OrderStats,
}
