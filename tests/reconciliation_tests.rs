//! Testes do protocolo de reconciliação financeira
//!
//! Caminhada por um razão em memória montado sobre as funções reais de
//! `common::money`: upsert de pagamento por pedido com `payment_delta`,
//! ajuste incremental do caixa, recálculo completo da dívida com
//! `delivered_value` + `loan_from_totals` e auditoria com `resync_total`.
//! Propriedades:
//! - reconciliar N vezes com o mesmo valor equivale a reconciliar uma
//! - o caixa registrado é sempre igual à recomputação do histórico
//! - a dívida nunca fica negativa

use bakery_backend::common::money::{
    delivered_value, loan_from_totals, payment_delta, quantize_money, quantize_qty, resync_total,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Razão em memória sobre as mesmas funções puras do serviço financeiro
// ============================================================================

#[derive(Debug, Clone)]
struct OrderLine {
    unit_price: Decimal,
    ordered: Decimal,
    delivered: Decimal,
}

#[derive(Debug, Clone)]
struct LedgerOrder {
    shop: usize,
    lines: Vec<OrderLine>,
    received: Decimal,
}

#[derive(Debug, Default)]
struct Ledger {
    orders: Vec<LedgerOrder>,
    // pagamento de coleta por pedido (chave do upsert)
    order_payments: HashMap<usize, Decimal>,
    // pagamentos sem pedido (quitações, avulsos), com a loja
    unkeyed_payments: Vec<(Option<usize>, Decimal)>,
    purchases: Vec<Decimal>,
    salaries: Vec<Decimal>,
    balance: Decimal,
    loans: HashMap<usize, Decimal>,
    ingredient_qty: Decimal,
}

impl Ledger {
    fn create_order(&mut self, shop: usize, lines: Vec<(Decimal, Decimal)>) -> usize {
        self.orders.push(LedgerOrder {
            shop,
            lines: lines
                .into_iter()
                .map(|(ordered, unit_price)| OrderLine {
                    unit_price,
                    ordered: quantize_qty(ordered),
                    delivered: Decimal::ZERO,
                })
                .collect(),
            received: Decimal::ZERO,
        });
        self.orders.len() - 1
    }

    /// Entrega + reconciliação, como confirm_delivery → process_order_payment.
    fn confirm_delivery(&mut self, order: usize, delivered: &[Decimal], received: Decimal) {
        let received = quantize_money(received);
        for (line, qty) in self.orders[order].lines.iter_mut().zip(delivered) {
            let qty = quantize_qty(*qty);
            assert!(qty >= line.delivered, "entrega nunca diminui");
            line.delivered = qty;
        }
        self.orders[order].received = received;
        self.process_order_payment(order);
    }

    /// O orquestrador: upsert com delta, ajuste do caixa, recálculo da dívida.
    fn process_order_payment(&mut self, order: usize) {
        let shop = self.orders[order].shop;
        let received = self.orders[order].received;

        let delta = payment_delta(self.order_payments.get(&order).copied(), received);
        self.order_payments.insert(order, received);
        self.balance += delta;

        self.recalc_loan(shop);
    }

    /// Estorno administrativo do pagamento de um pedido: remove o recibo,
    /// desfaz o efeito no caixa e recalcula a dívida.
    fn reverse_order_payment(&mut self, order: usize) {
        let shop = self.orders[order].shop;
        if let Some(amount) = self.order_payments.remove(&order) {
            self.balance -= amount;
        }
        self.orders[order].received = Decimal::ZERO;
        self.recalc_loan(shop);
    }

    /// Recálculo completo: dívida = max(0, entregue − recebido), cada linha
    /// quantizada antes da soma.
    fn recalc_loan(&mut self, shop: usize) {
        let lines: Vec<(Decimal, Decimal)> = self
            .orders
            .iter()
            .filter(|o| o.shop == shop)
            .flat_map(|o| o.lines.iter())
            .map(|l| (l.delivered, l.unit_price))
            .collect();
        let delivered_total = delivered_value(&lines);

        let received_total: Decimal = self
            .orders
            .iter()
            .enumerate()
            .filter(|(_, o)| o.shop == shop)
            .filter_map(|(i, _)| self.order_payments.get(&i))
            .copied()
            .sum::<Decimal>()
            + self
                .unkeyed_payments
                .iter()
                .filter(|(s, _)| *s == Some(shop))
                .map(|(_, a)| *a)
                .sum::<Decimal>();

        self.loans
            .insert(shop, loan_from_totals(delivered_total, received_total));
    }

    fn repay_loan(&mut self, shop: usize, amount: Decimal) {
        let amount = quantize_money(amount);
        self.unkeyed_payments.push((Some(shop), amount));
        self.balance += amount;
        self.recalc_loan(shop);
    }

    fn record_purchase(&mut self, qty: Decimal, price: Decimal) {
        let price = quantize_money(price);
        self.purchases.push(price);
        self.ingredient_qty += quantize_qty(qty);
        self.balance -= price;
    }

    fn pay_salary(&mut self, amount: Decimal) {
        let amount = quantize_money(amount);
        self.salaries.push(amount);
        self.balance -= amount;
    }

    /// Recomputação do caixa a partir do histórico completo.
    fn full_resync(&self) -> Decimal {
        let payments_in: Decimal = self.order_payments.values().copied().sum::<Decimal>()
            + self.unkeyed_payments.iter().map(|(_, a)| *a).sum::<Decimal>();
        let purchases_out: Decimal = self.purchases.iter().copied().sum();
        let salaries_out: Decimal = self.salaries.iter().copied().sum();
        resync_total(payments_in, purchases_out, salaries_out)
    }

    fn loan(&self, shop: usize) -> Decimal {
        self.loans.get(&shop).copied().unwrap_or(Decimal::ZERO)
    }
}

// ============================================================================
// Unit Tests (cenários de ponta a ponta)
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Fluxo completo: pedido de 10 @ 100.00, entrega total com 300.00
    /// recebidos. Pagamento vira 300.00, caixa sobe 300.00, dívida 700.00.
    #[test]
    fn test_full_flow_scenario() {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);

        ledger.confirm_delivery(order, &[dec("10")], dec("300.00"));

        assert_eq!(ledger.order_payments[&order], dec("300.00"));
        assert_eq!(ledger.balance, dec("300.00"));
        assert_eq!(ledger.loan(0), dec("700.00"));
    }

    /// Correção: reconfirmar com o mesmo valor não muda nada; subir o
    /// recebido para 1000.00 aplica só a diferença de 700.00 e zera a dívida.
    #[test]
    fn test_correction_scenario() {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);
        ledger.confirm_delivery(order, &[dec("10")], dec("300.00"));

        let balance_before = ledger.balance;
        ledger.confirm_delivery(order, &[dec("10")], dec("300.00"));
        assert_eq!(ledger.balance, balance_before, "reconfirmação é no-op");
        assert_eq!(ledger.loan(0), dec("700.00"));

        ledger.confirm_delivery(order, &[dec("10")], dec("1000.00"));
        assert_eq!(ledger.balance, dec("1000.00"), "só o delta de 700 entrou");
        assert_eq!(ledger.loan(0), dec("0.00"));
    }

    /// Compra de insumo: caixa 1000.00 menos compra de 200.00 dá 800.00 e o
    /// ingrediente sobe 5.
    #[test]
    fn test_purchase_scenario() {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);
        ledger.confirm_delivery(order, &[dec("10")], dec("1000.00"));
        assert_eq!(ledger.balance, dec("1000.00"));

        ledger.record_purchase(dec("5"), dec("200.00"));

        assert_eq!(ledger.balance, dec("800.00"));
        assert_eq!(ledger.ingredient_qty, dec("5.000"));
        assert_eq!(ledger.balance, ledger.full_resync());
    }

    /// Quitação de dívida credita o caixa uma única vez e abate a dívida.
    #[test]
    fn test_loan_repayment_counts_once() {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);
        ledger.confirm_delivery(order, &[dec("10")], dec("300.00"));

        ledger.repay_loan(0, dec("700.00"));

        assert_eq!(ledger.balance, dec("1000.00"));
        assert_eq!(ledger.loan(0), dec("0.00"));
        assert_eq!(ledger.balance, ledger.full_resync());
    }

    /// Estorno do pagamento: a dívida volta ao valor entregue e o caixa
    /// continua batendo com a recomputação do histórico.
    #[test]
    fn test_payment_reversal_restores_loan() {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);
        ledger.confirm_delivery(order, &[dec("10")], dec("300.00"));
        assert_eq!(ledger.loan(0), dec("700.00"));

        ledger.reverse_order_payment(order);

        assert_eq!(ledger.balance, dec("0.00"));
        assert_eq!(ledger.loan(0), dec("1000.00"));
        assert_eq!(ledger.balance, ledger.full_resync());
    }

    /// Pagamento acima da dívida não gera crédito: a dívida trava em zero.
    #[test]
    fn test_overpayment_clamps_loan() {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);
        ledger.confirm_delivery(order, &[dec("10")], dec("1500.00"));

        assert_eq!(ledger.loan(0), dec("0.00"));
        assert_eq!(ledger.balance, dec("1500.00"));
    }

    /// Entrega parcial usa o valor entregue, não o pedido, no total da dívida.
    #[test]
    fn test_partial_delivery_loan_uses_delivered_value() {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);
        ledger.confirm_delivery(order, &[dec("4")], dec("100.00"));

        // entregue 4 * 100 = 400, recebido 100 → dívida 300
        assert_eq!(ledger.loan(0), dec("300.00"));
    }

    /// Salário baixa o caixa e entra na recomputação.
    #[test]
    fn test_salary_deducts_balance() {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);
        ledger.confirm_delivery(order, &[dec("10")], dec("1000.00"));

        ledger.pay_salary(dec("250.00"));

        assert_eq!(ledger.balance, dec("750.00"));
        assert_eq!(ledger.balance, ledger.full_resync());
    }

    /// Lojas diferentes têm dívidas independentes.
    #[test]
    fn test_loans_are_per_shop() {
        let mut ledger = Ledger::default();
        let a = ledger.create_order(0, vec![(dec("10"), dec("100.00"))]);
        let b = ledger.create_order(1, vec![(dec("2"), dec("50.00"))]);

        ledger.confirm_delivery(a, &[dec("10")], dec("300.00"));
        ledger.confirm_delivery(b, &[dec("2")], dec("0.00"));

        assert_eq!(ledger.loan(0), dec("700.00"));
        assert_eq!(ledger.loan(1), dec("100.00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn money_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_00i64).prop_map(|n| Decimal::new(n, 2))
}

fn qty_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Idempotência do orquestrador: reconciliar o mesmo pedido N vezes deixa
    /// caixa e dívida exatamente como após a primeira vez.
    #[test]
    fn test_orchestrator_idempotent(
        qty in qty_strategy(),
        price in money_strategy(),
        received in money_strategy(),
        repeats in 1usize..5
    ) {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(qty, price)]);
        ledger.confirm_delivery(order, &[qty], received);

        let balance = ledger.balance;
        let loan = ledger.loan(0);

        for _ in 0..repeats {
            ledger.process_order_payment(order);
        }

        prop_assert_eq!(ledger.balance, balance);
        prop_assert_eq!(ledger.loan(0), loan);
    }

    /// Após qualquer sequência serial de operações, o caixa registrado bate
    /// com a recomputação do histórico completo.
    #[test]
    fn test_balance_matches_full_resync(
        ops in prop::collection::vec(
            (0usize..5, qty_strategy(), money_strategy()),
            1..20
        )
    ) {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(dec("100"), dec("10.00"))]);

        for (kind, qty, amount) in ops {
            match kind {
                0 => ledger.confirm_delivery(order, &[dec("100")], amount),
                1 => ledger.record_purchase(qty, amount),
                2 => ledger.pay_salary(amount),
                3 => ledger.reverse_order_payment(order),
                _ => ledger.repay_loan(0, amount),
            }
        }

        prop_assert_eq!(ledger.balance, ledger.full_resync());
    }

    /// A dívida nunca fica negativa, qualquer que seja o recebido.
    #[test]
    fn test_loan_never_negative(
        qty in qty_strategy(),
        price in money_strategy(),
        received in money_strategy()
    ) {
        let mut ledger = Ledger::default();
        let order = ledger.create_order(0, vec![(qty, price)]);
        ledger.confirm_delivery(order, &[qty], received);

        prop_assert!(ledger.loan(0) >= Decimal::ZERO);
    }
}
