// src/services/finance_service.rs
//
// O caminho único de escrita do estado financeiro. Toda atualização de
// pagamento, caixa e dívida de loja passa por aqui — confirmação de entrega,
// edição administrativa, quitação de dívida. Nenhum outro lugar repete essa
// aritmética.

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::money::{delivered_value, loan_from_totals, payment_delta, quantize_money, resync_total},
    db::{FinanceRepository, OrdersRepository, ShopsRepository},
    models::finance::{BakeryBalance, BalanceAudit, LoanRepayment, Payment, PaymentType},
};

#[derive(Clone)]
pub struct FinanceService {
    finance_repo: FinanceRepository,
    orders_repo: OrdersRepository,
    shops_repo: ShopsRepository,
}

impl FinanceService {
    pub fn new(
        finance_repo: FinanceRepository,
        orders_repo: OrdersRepository,
        shops_repo: ShopsRepository,
    ) -> Self {
        Self {
            finance_repo,
            orders_repo,
            shops_repo,
        }
    }

    /// Reconciliação de um pedido, atômica:
    /// 1. upsert do pagamento de coleta (no máximo um por pedido), obtendo o delta;
    /// 2. ajuste incremental do caixa pelo delta;
    /// 3. recálculo COMPLETO da dívida da loja.
    ///
    /// Chamar N vezes com o mesmo received_amount não muda nada depois da
    /// primeira — o delta sai zero e o recálculo é um ponto fixo.
    pub async fn process_order_payment<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .orders_repo
            .get_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        // Trava a loja pela duração da transação: duas entregas concorrentes
        // para a mesma loja serializam aqui.
        let shop = self
            .shops_repo
            .get_shop_for_update(&mut *tx, order.shop_id)
            .await?
            .ok_or(AppError::ShopNotFound)?;

        let received = quantize_money(order.received_amount);
        let delta = self
            .upsert_order_payment(&mut tx, order.id, shop.id, received)
            .await?;

        if !delta.is_zero() {
            self.finance_repo.adjust_balance(&mut *tx, delta).await?;
            tracing::info!(
                "Pagamento do pedido {} reconciliado: delta {} aplicado ao caixa",
                order.id,
                delta
            );
        }

        self.recalc_shop_loan_locked(&mut tx, shop.id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Upsert do pagamento de coleta do pedido. Retorna o delta assinado
    /// (novo − antigo) para o ajuste incremental do caixa; pagamento novo
    /// conta contra uma base implícita de zero.
    async fn upsert_order_payment(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        order_id: Uuid,
        shop_id: Uuid,
        amount: Decimal,
    ) -> Result<Decimal, AppError> {
        let existing = self
            .finance_repo
            .get_payment_by_order(&mut **tx, order_id)
            .await?;

        let delta = payment_delta(existing.as_ref().map(|p| p.amount), amount);
        match existing {
            Some(payment) if payment.amount == amount => {}
            Some(payment) => {
                self.finance_repo
                    .update_payment_amount(&mut **tx, payment.id, amount)
                    .await?;
            }
            None => {
                self.finance_repo
                    .insert_order_payment(&mut **tx, order_id, shop_id, amount)
                    .await?;
            }
        }
        Ok(delta)
    }

    /// Recalcula a dívida da loja do zero. Puro e idempotente: sempre converge
    /// para o mesmo valor independente da ordem de chamadas. Pré-condição: a
    /// linha da loja já está travada nesta transação.
    async fn recalc_shop_loan_locked(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        shop_id: Uuid,
    ) -> Result<Decimal, AppError> {
        let lines = self
            .orders_repo
            .delivered_lines_for_shop(&mut **tx, shop_id)
            .await?;
        let delivered_total = delivered_value(&lines);

        let received_total = quantize_money(
            self.finance_repo
                .sum_payments_for_shop(&mut **tx, shop_id)
                .await?,
        );

        let loan = loan_from_totals(delivered_total, received_total);
        self.shops_repo
            .update_loan_balance(&mut **tx, shop_id, loan)
            .await?;
        Ok(loan)
    }

    /// Quitação de dívida: grava o histórico, o recibo (Payment sem pedido),
    /// credita o caixa uma única vez e recalcula a dívida.
    pub async fn record_loan_repayment<'e, E>(
        &self,
        executor: E,
        shop_id: Uuid,
        amount: Decimal,
    ) -> Result<LoanRepayment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let shop = self
            .shops_repo
            .get_shop_for_update(&mut *tx, shop_id)
            .await?
            .ok_or(AppError::ShopNotFound)?;

        let amount = quantize_money(amount);

        let repayment = self
            .finance_repo
            .insert_loan_repayment(&mut *tx, shop.id, amount)
            .await?;

        // O efeito de caixa vive no Payment pareado; a linha de histórico
        // acima nunca é somada de novo.
        self.finance_repo
            .insert_unkeyed_payment(&mut *tx, Some(shop.id), amount, PaymentType::Repayment, None)
            .await?;

        self.finance_repo.adjust_balance(&mut *tx, amount).await?;
        self.recalc_shop_loan_locked(&mut tx, shop.id).await?;

        tx.commit().await?;

        tracing::info!("Quitação de {} registrada para a loja {}", amount, shop.name);
        Ok(repayment)
    }

    /// Estorno administrativo de um pagamento: desfaz o efeito no caixa e
    /// recalcula a dívida da loja, se houver loja associada.
    pub async fn reverse_payment<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // Mesma ordem de locks do orquestrador (loja antes do pagamento),
        // senão estorno e entrega concorrentes para a mesma loja se
        // bloqueiam mutuamente. A leitura inicial é sem lock.
        let payment = self
            .finance_repo
            .get_payment(&mut *tx, payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        if let Some(shop_id) = payment.shop_id {
            self.shops_repo
                .get_shop_for_update(&mut *tx, shop_id)
                .await?
                .ok_or(AppError::ShopNotFound)?;
        }

        let payment = self
            .finance_repo
            .get_payment_for_update(&mut *tx, payment.id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        self.finance_repo.delete_payment(&mut *tx, payment.id).await?;
        self.finance_repo
            .adjust_balance(&mut *tx, -payment.amount)
            .await?;

        if let Some(shop_id) = payment.shop_id {
            self.recalc_shop_loan_locked(&mut tx, shop_id).await?;
        }

        tx.commit().await?;

        tracing::warn!(
            "Pagamento {} estornado (valor {})",
            payment.id,
            payment.amount
        );
        Ok(payment)
    }

    /// Ajuste direto do caixa, para os fluxos que não envolvem pedido
    /// (compras, salários). Roda dentro da transação do chamador.
    pub(crate) async fn adjust_balance_in(
        &self,
        conn: &mut PgConnection,
        delta: Decimal,
    ) -> Result<BakeryBalance, AppError> {
        self.finance_repo.adjust_balance(conn, delta).await
    }

    /// Auditoria: compara o caixa corrente com a recomputação do histórico
    /// completo. Divergência é logada como aviso, nunca vira erro — a
    /// detecção é o objetivo, a correção é decisão administrativa.
    pub async fn audit_balance<'e, E>(&self, executor: E) -> Result<BalanceAudit, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let recorded = self.finance_repo.get_balance(&mut *tx).await?.amount;
        let payments_in = self.finance_repo.sum_all_payments(&mut *tx).await?;
        let purchases_out = self.finance_repo.sum_purchase_costs(&mut *tx).await?;
        let salaries_out = self.finance_repo.sum_salary_payments(&mut *tx).await?;

        tx.commit().await?;

        let resynced = resync_total(payments_in, purchases_out, salaries_out);
        let drift = quantize_money(recorded - resynced);

        if !drift.is_zero() {
            tracing::warn!(
                "Caixa divergente: registrado {}, recomputado {}, drift {}",
                recorded,
                resynced,
                drift
            );
        }

        Ok(BalanceAudit {
            recorded,
            resynced,
            drift,
        })
    }

    /// Reparo administrativo: grava no singleton o valor recomputado do
    /// histórico. Não faz parte do caminho normal por evento.
    pub async fn resync_balance<'e, E>(&self, executor: E) -> Result<BakeryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let payments_in = self.finance_repo.sum_all_payments(&mut *tx).await?;
        let purchases_out = self.finance_repo.sum_purchase_costs(&mut *tx).await?;
        let salaries_out = self.finance_repo.sum_salary_payments(&mut *tx).await?;
        let resynced = resync_total(payments_in, purchases_out, salaries_out);

        let balance = self.finance_repo.set_balance(&mut *tx, resynced).await?;
        tx.commit().await?;

        tracing::warn!("Caixa re-sincronizado para {}", balance.amount);
        Ok(balance)
    }

    /// Zera o caixa (re-baseline controlado, uso administrativo).
    pub async fn reset_balance<'e, E>(&self, executor: E) -> Result<BakeryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance = self
            .finance_repo
            .set_balance(executor, Decimal::ZERO)
            .await?;
        tracing::warn!("⚠️ Caixa zerado por ação administrativa");
        Ok(balance)
    }

    pub async fn list_loan_repayments(&self) -> Result<Vec<LoanRepayment>, AppError> {
        self.finance_repo.list_loan_repayments().await
    }
}
