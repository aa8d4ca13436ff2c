// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

/// Arredonda um valor monetário para 2 casas decimais (half-up).
///
/// Todo valor em dinheiro passa por aqui exatamente uma vez, na fronteira
/// onde é persistido ou comparado. Nenhuma aritmética de float toca dinheiro.
pub fn quantize_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Arredonda uma quantidade física (kg, litro, meshok) para 3 casas decimais.
pub fn quantize_qty(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Valor entregue de uma linha de pedido: quantidade entregue × preço unitário,
/// quantizado termo a termo ANTES de somar (evita acumular erro de arredondamento).
pub fn delivered_value(lines: &[(Decimal, Decimal)]) -> Decimal {
    lines
        .iter()
        .map(|(delivered, unit_price)| quantize_money(delivered * unit_price))
        .sum()
}

/// Dívida da loja: valor entregue menos total recebido, nunca negativa.
/// Pagamento em excesso é absorvido, não vira crédito.
pub fn loan_from_totals(delivered_total: Decimal, received_total: Decimal) -> Decimal {
    let loan = delivered_total - received_total;
    if loan < Decimal::ZERO {
        return Decimal::ZERO;
    }
    quantize_money(loan)
}

/// Delta assinado do upsert de pagamento: valor novo menos o existente.
/// Pagamento ausente conta contra uma base implícita de zero; valor
/// inalterado dá delta zero, o que torna a reconciliação idempotente.
pub fn payment_delta(existing: Option<Decimal>, new_amount: Decimal) -> Decimal {
    new_amount - existing.unwrap_or(Decimal::ZERO)
}

/// Recomputa o caixa a partir do histórico completo: tudo que entrou
/// (pagamentos de qualquer tipo) menos tudo que saiu (compras e salários).
/// Caminho de auditoria — o caminho normal é o ajuste incremental.
pub fn resync_total(payments_in: Decimal, purchases_out: Decimal, salaries_out: Decimal) -> Decimal {
    quantize_money(payments_in - purchases_out - salaries_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn quantize_money_rounds_half_up() {
        assert_eq!(quantize_money(dec("10.123")), dec("10.12"));
        assert_eq!(quantize_money(dec("10.125")), dec("10.13"));
        assert_eq!(quantize_money(dec("10.999")), dec("11.00"));
        assert_eq!(quantize_money(dec("10")), dec("10.00"));
    }

    #[test]
    fn quantize_money_is_idempotent() {
        let x = dec("123.4567");
        assert_eq!(quantize_money(quantize_money(x)), quantize_money(x));
    }

    #[test]
    fn quantize_qty_uses_three_places() {
        assert_eq!(quantize_qty(dec("1.2345")), dec("1.235"));
        assert_eq!(quantize_qty(dec("1.2344")), dec("1.234"));
    }

    #[test]
    fn delivered_value_quantizes_each_term() {
        // Cada termo arredonda antes da soma: 3 × 0.335 = 1.005 -> 1.01
        let lines = vec![(dec("3"), dec("0.335")), (dec("2"), dec("10.50"))];
        assert_eq!(delivered_value(&lines), dec("22.01"));
    }

    #[test]
    fn payment_delta_is_zero_when_unchanged() {
        assert_eq!(payment_delta(Some(dec("300.00")), dec("300.00")), dec("0.00"));
    }

    #[test]
    fn payment_delta_is_difference_when_changed() {
        assert_eq!(
            payment_delta(Some(dec("300.00")), dec("1000.00")),
            dec("700.00")
        );
        assert_eq!(
            payment_delta(Some(dec("300.00")), dec("100.00")),
            dec("-200.00")
        );
    }

    #[test]
    fn payment_delta_is_full_amount_when_absent() {
        assert_eq!(payment_delta(None, dec("300.00")), dec("300.00"));
    }

    #[test]
    fn loan_never_goes_negative() {
        assert_eq!(loan_from_totals(dec("100.00"), dec("300.00")), dec("0.00"));
        assert_eq!(loan_from_totals(dec("1000.00"), dec("300.00")), dec("700.00"));
    }
}
