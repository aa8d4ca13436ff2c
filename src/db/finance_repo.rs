// src/db/finance_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{BakeryBalance, LoanRepayment, Payment, PaymentType},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Pagamentos
    // ---

    pub async fn get_payment_by_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE order_id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(executor)
        .await?;
        Ok(payment)
    }

    pub async fn insert_order_payment<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        shop_id: Uuid,
        amount: Decimal,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (order_id, shop_id, amount, payment_type)
            VALUES ($1, $2, $3, 'COLLECTION')
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(shop_id)
        .bind(amount)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    pub async fn update_payment_amount<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
        amount: Decimal,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            "UPDATE payments SET amount = $2, date = now() WHERE id = $1 RETURNING *",
        )
        .bind(payment_id)
        .bind(amount)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    /// Pagamento sem chave de pedido: sempre insere (quitações, coletas avulsas).
    pub async fn insert_unkeyed_payment<'e, E>(
        &self,
        executor: E,
        shop_id: Option<Uuid>,
        amount: Decimal,
        payment_type: PaymentType,
        note: Option<&str>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (shop_id, amount, payment_type, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(shop_id)
        .bind(amount)
        .bind(payment_type)
        .bind(note)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    pub async fn get_payment<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(payment_id)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }

    pub async fn get_payment_for_update<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1 FOR UPDATE")
                .bind(payment_id)
                .fetch_optional(executor)
                .await?;
        Ok(payment)
    }

    pub async fn delete_payment<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(payment_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Total recebido da loja, TODOS os tipos de pagamento.
    pub async fn sum_payments_for_shop<'e, E>(
        &self,
        executor: E,
        shop_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE shop_id = $1",
        )
        .bind(shop_id)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    // ---
    // Somatórios do histórico, usados só pela auditoria (full resync).
    // ---

    pub async fn sum_all_payments<'e, E>(&self, executor: E) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total =
            sqlx::query_scalar::<_, Decimal>("SELECT COALESCE(SUM(amount), 0) FROM payments")
                .fetch_one(executor)
                .await?;
        Ok(total)
    }

    pub async fn sum_purchase_costs<'e, E>(&self, executor: E) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total =
            sqlx::query_scalar::<_, Decimal>("SELECT COALESCE(SUM(price), 0) FROM purchases")
                .fetch_one(executor)
                .await?;
        Ok(total)
    }

    pub async fn sum_salary_payments<'e, E>(&self, executor: E) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM salary_payments",
        )
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn received_today(&self) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payments
            WHERE payment_type = 'COLLECTION' AND date::date = CURRENT_DATE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // ---
    // Saldo da padaria (singleton, id fixo = 1)
    // ---

    /// Aplica um delta assinado ao caixa. O UPDATE relativo é atômico no
    /// banco: dois ajustes concorrentes serializam na linha, sem lost update.
    pub async fn adjust_balance<'e, E>(
        &self,
        executor: E,
        delta: Decimal,
    ) -> Result<BakeryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance = sqlx::query_as::<_, BakeryBalance>(
            r#"
            UPDATE bakery_balance
            SET amount = amount + $1, updated_at = now()
            WHERE id = 1
            RETURNING *
            "#,
        )
        .bind(delta)
        .fetch_one(executor)
        .await?;
        Ok(balance)
    }

    pub async fn get_balance<'e, E>(&self, executor: E) -> Result<BakeryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance =
            sqlx::query_as::<_, BakeryBalance>("SELECT * FROM bakery_balance WHERE id = 1")
                .fetch_one(executor)
                .await?;
        Ok(balance)
    }

    pub async fn current_balance(&self) -> Result<BakeryBalance, AppError> {
        self.get_balance(&self.pool).await
    }

    /// Grava um valor absoluto no caixa (reset ou re-sincronização).
    pub async fn set_balance<'e, E>(
        &self,
        executor: E,
        amount: Decimal,
    ) -> Result<BakeryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance = sqlx::query_as::<_, BakeryBalance>(
            "UPDATE bakery_balance SET amount = $1, updated_at = now() WHERE id = 1 RETURNING *",
        )
        .bind(amount)
        .fetch_one(executor)
        .await?;
        Ok(balance)
    }

    // ---
    // Quitações de dívida (histórico)
    // ---

    pub async fn insert_loan_repayment<'e, E>(
        &self,
        executor: E,
        shop_id: Uuid,
        amount: Decimal,
    ) -> Result<LoanRepayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let repayment = sqlx::query_as::<_, LoanRepayment>(
            "INSERT INTO loan_repayments (shop_id, amount) VALUES ($1, $2) RETURNING *",
        )
        .bind(shop_id)
        .bind(amount)
        .fetch_one(executor)
        .await?;
        Ok(repayment)
    }

    pub async fn list_loan_repayments(&self) -> Result<Vec<LoanRepayment>, AppError> {
        let repayments = sqlx::query_as::<_, LoanRepayment>(
            "SELECT * FROM loan_repayments ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(repayments)
    }
}
