//! Testes da máquina de estados de entrega do pedido
//!
//! Exercitam `OrderStatus::from_deliveries`, a função pura que decide o
//! status a partir dos pares (entregue, pedido) dos itens.

use bakery_backend::models::orders::OrderStatus;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Pedido de dois itens (10 e 5): entregar só o primeiro deixa o pedido
    /// parcial; completar o segundo fecha a entrega.
    #[test]
    fn test_two_item_order_transitions() {
        let pending = vec![(dec("0"), dec("10")), (dec("0"), dec("5"))];
        assert_eq!(
            OrderStatus::from_deliveries(&pending),
            OrderStatus::Pending
        );

        let partial = vec![(dec("10"), dec("10")), (dec("0"), dec("5"))];
        assert_eq!(
            OrderStatus::from_deliveries(&partial),
            OrderStatus::PartiallyDelivered
        );

        let complete = vec![(dec("10"), dec("10")), (dec("5"), dec("5"))];
        assert_eq!(
            OrderStatus::from_deliveries(&complete),
            OrderStatus::Delivered
        );
    }

    /// Entrega acima do pedido continua valendo como entregue.
    #[test]
    fn test_over_delivery_counts_as_delivered() {
        let items = vec![(dec("12"), dec("10"))];
        assert_eq!(OrderStatus::from_deliveries(&items), OrderStatus::Delivered);
    }

    /// Entrega fracionada de um único item fica parcial.
    #[test]
    fn test_fractional_delivery_is_partial() {
        let items = vec![(dec("4.5"), dec("10"))];
        assert_eq!(
            OrderStatus::from_deliveries(&items),
            OrderStatus::PartiallyDelivered
        );
    }

    #[test]
    fn test_empty_order_is_pending() {
        assert_eq!(OrderStatus::from_deliveries(&[]), OrderStatus::Pending);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn qty_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

// Quantidade pedida é sempre positiva (item de pedido com zero não existe).
fn ordered_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

fn items_strategy() -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
    prop::collection::vec((qty_strategy(), ordered_strategy()), 1..8)
}

proptest! {
    /// Monotonia: completar todas as entregas de qualquer pedido leva a
    /// Delivered, nunca de volta a Pending.
    #[test]
    fn test_full_delivery_always_delivered(items in items_strategy()) {
        let completed: Vec<(Decimal, Decimal)> = items
            .iter()
            .map(|(_, ordered)| (*ordered, *ordered))
            .collect();
        prop_assert_eq!(
            OrderStatus::from_deliveries(&completed),
            OrderStatus::Delivered
        );
    }

    /// Zerar todas as entregas leva sempre a Pending.
    #[test]
    fn test_no_delivery_always_pending(items in items_strategy()) {
        let untouched: Vec<(Decimal, Decimal)> = items
            .iter()
            .map(|(_, ordered)| (Decimal::ZERO, *ordered))
            .collect();
        prop_assert_eq!(
            OrderStatus::from_deliveries(&untouched),
            OrderStatus::Pending
        );
    }

    /// A função é determinística sobre os mesmos pares.
    #[test]
    fn test_status_deterministic(items in items_strategy()) {
        prop_assert_eq!(
            OrderStatus::from_deliveries(&items),
            OrderStatus::from_deliveries(&items)
        );
    }
}
