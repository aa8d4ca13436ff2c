//! Testes da aritmética monetária da padaria
//!
//! Exercitam as funções reais de `common::money`:
//! - quantização de dinheiro (2 casas, half-up) e de quantidades (3 casas)
//! - valor entregue quantizado termo a termo
//! - dívida clampada em zero
//! - delta assinado do upsert de pagamento
//! Com propriedades proptest: idempotência da quantização, escala máxima e
//! dívida nunca negativa.

use bakery_backend::common::money::{
    delivered_value, loan_from_totals, payment_delta, quantize_money, quantize_qty,
};
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

    /// Meio centavo arredonda para cima, não banker's rounding.
    #[test]
    fn test_money_rounds_half_up() {
        assert_eq!(quantize_money(dec("10.125")), dec("10.13"));
        assert_eq!(quantize_money(dec("10.135")), dec("10.14"));
        assert_eq!(quantize_money(dec("2.675")), dec("2.68"));
    }

    #[test]
    fn test_money_negative_rounds_away_from_zero() {
        assert_eq!(quantize_money(dec("-10.125")), dec("-10.13"));
    }

    #[test]
    fn test_qty_uses_three_places() {
        assert_eq!(quantize_qty(dec("1.2345")), dec("1.235"));
        assert_eq!(quantize_qty(dec("0.0005")), dec("0.001"));
    }

    /// Cada linha é quantizada ANTES da soma, nunca depois.
    #[test]
    fn test_delivered_value_quantizes_per_line() {
        // 3 linhas de 0.335 * 21.90: por linha dá 3 * 7.34 = 22.02;
        // somar primeiro e quantizar depois daria 22.01.
        let lines = vec![
            (dec("0.335"), dec("21.90")),
            (dec("0.335"), dec("21.90")),
            (dec("0.335"), dec("21.90")),
        ];
        assert_eq!(delivered_value(&lines), dec("22.02"));
    }

    #[test]
    fn test_loan_clamped_at_zero() {
        assert_eq!(loan_from_totals(dec("100.00"), dec("300.00")), dec("0.00"));
        assert_eq!(loan_from_totals(dec("1000.00"), dec("300.00")), dec("700.00"));
    }

    /// O delta do upsert: zero sem mudança, diferença quando muda, valor
    /// cheio para pagamento novo.
    #[test]
    fn test_payment_delta_cases() {
        assert_eq!(payment_delta(Some(dec("300.00")), dec("300.00")), dec("0.00"));
        assert_eq!(
            payment_delta(Some(dec("300.00")), dec("1000.00")),
            dec("700.00")
        );
        assert_eq!(payment_delta(None, dec("300.00")), dec("300.00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn money_strategy() -> impl Strategy<Value = Decimal> {
    // Valores com até 6 casas, na faixa operacional da padaria.
    (-100_000_000_000i64..100_000_000_000i64).prop_map(|n| Decimal::new(n, 6))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Quantizar duas vezes é o mesmo que quantizar uma.
    #[test]
    fn test_quantize_money_idempotent(value in money_strategy()) {
        let once = quantize_money(value);
        prop_assert_eq!(quantize_money(once), once);
    }

    /// O resultado nunca tem mais de 2 casas decimais.
    #[test]
    fn test_quantize_money_scale(value in money_strategy()) {
        prop_assert!(quantize_money(value).scale() <= 2);
    }

    #[test]
    fn test_quantize_qty_idempotent(value in money_strategy()) {
        let once = quantize_qty(value);
        prop_assert_eq!(quantize_qty(once), once);
        prop_assert!(once.scale() <= 3);
    }

    /// A dívida recalculada nunca fica negativa, qualquer que seja o excesso
    /// recebido.
    #[test]
    fn test_loan_never_negative(
        delivered in money_strategy(),
        received in money_strategy()
    ) {
        let loan = loan_from_totals(quantize_money(delivered), quantize_money(received));
        prop_assert!(loan >= Decimal::ZERO);
        prop_assert!(loan.scale() <= 2);
    }

    /// Recalcular a dívida a partir dos mesmos totais é um ponto fixo.
    #[test]
    fn test_loan_recalc_fixed_point(
        delivered in money_strategy(),
        received in money_strategy()
    ) {
        let first = loan_from_totals(delivered, received);
        let second = loan_from_totals(delivered, received);
        prop_assert_eq!(first, second);
    }

    /// Aplicar o delta sobre o valor antigo reconstrói o valor novo, para
    /// qualquer par (existente, novo).
    #[test]
    fn test_payment_delta_reconstructs_new_amount(
        old in money_strategy(),
        new in money_strategy()
    ) {
        let old = quantize_money(old);
        let new = quantize_money(new);
        prop_assert_eq!(old + payment_delta(Some(old), new), new);
        prop_assert_eq!(payment_delta(Some(new), new), Decimal::ZERO);
    }
}
