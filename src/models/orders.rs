// src/models/orders.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::money::quantize_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    PartiallyDelivered,
    Delivered,
}

impl OrderStatus {
    /// O status é uma função pura dos pares (entregue, pedido) dos itens:
    /// tudo zero → Pending; todo item com entregue >= pedido → Delivered;
    /// qualquer outra combinação → PartiallyDelivered.
    /// Pedido sem itens conta como Pending.
    pub fn from_deliveries(items: &[(Decimal, Decimal)]) -> OrderStatus {
        if items.iter().all(|(delivered, _)| delivered.is_zero()) {
            return OrderStatus::Pending;
        }
        if items
            .iter()
            .all(|(delivered, ordered)| delivered >= ordered)
        {
            return OrderStatus::Delivered;
        }
        OrderStatus::PartiallyDelivered
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub order_date: NaiveDate,
    pub status: OrderStatus,

    // Valor ACUMULADO recebido por este pedido até agora.
    // Confirmar entrega substitui o valor inteiro, não soma.
    pub received_amount: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub ordered_quantity: Decimal,

    // Preço travado na criação do pedido.
    pub unit_price: Decimal,

    // Monotônica: só cresce durante a vida do pedido.
    pub delivered_quantity: Decimal,
}

impl OrderItem {
    pub fn total_price(&self) -> Decimal {
        quantize_money(self.ordered_quantity * self.unit_price)
    }
}

// Pedido completo com itens, para as telas de detalhe/confirmação.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Order,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn status_pending_when_nothing_delivered() {
        let items = vec![(dec("0"), dec("10")), (dec("0"), dec("5"))];
        assert_eq!(OrderStatus::from_deliveries(&items), OrderStatus::Pending);
    }

    #[test]
    fn status_partial_when_some_delivered() {
        let items = vec![(dec("10"), dec("10")), (dec("0"), dec("5"))];
        assert_eq!(
            OrderStatus::from_deliveries(&items),
            OrderStatus::PartiallyDelivered
        );
    }

    #[test]
    fn status_delivered_when_all_complete() {
        let items = vec![(dec("10"), dec("10")), (dec("5"), dec("5"))];
        assert_eq!(OrderStatus::from_deliveries(&items), OrderStatus::Delivered);
    }

    #[test]
    fn over_delivery_still_counts_as_delivered() {
        let items = vec![(dec("12"), dec("10"))];
        assert_eq!(OrderStatus::from_deliveries(&items), OrderStatus::Delivered);
    }

    #[test]
    fn empty_order_is_pending() {
        assert_eq!(OrderStatus::from_deliveries(&[]), OrderStatus::Pending);
    }

    #[test]
    fn item_total_price_quantizes() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            ordered_quantity: dec("3"),
            unit_price: dec("10.50"),
            delivered_quantity: dec("0"),
        };
        assert_eq!(item.total_price(), dec("31.50"));
    }
}
