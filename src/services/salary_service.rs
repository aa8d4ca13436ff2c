// src/services/salary_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::money::quantize_money,
    db::SalaryRepository,
    models::salary::{Employee, SalaryPayment},
    services::FinanceService,
};

#[derive(Clone)]
pub struct SalaryService {
    pool: PgPool,
    salary_repo: SalaryRepository,
    finance: FinanceService,
}

impl SalaryService {
    pub fn new(pool: PgPool, salary_repo: SalaryRepository, finance: FinanceService) -> Self {
        Self {
            pool,
            salary_repo,
            finance,
        }
    }

    pub async fn create_employee(&self, name: &str) -> Result<Employee, AppError> {
        self.salary_repo.create_employee(&self.pool, name).await
    }

    /// Registro e baixa no caixa na mesma transação: ou o pagamento existe e
    /// o caixa caiu, ou nenhum dos dois.
    pub async fn record_salary_payment(
        &self,
        employee_id: Uuid,
        amount: Decimal,
        note: Option<&str>,
    ) -> Result<SalaryPayment, AppError> {
        let mut tx = self.pool.begin().await?;

        let employee = self
            .salary_repo
            .get_employee(&mut *tx, employee_id)
            .await?
            .ok_or(AppError::EmployeeNotFound)?;

        let amount = quantize_money(amount);
        let payment = self
            .salary_repo
            .insert_salary_payment(&mut *tx, employee.id, amount, note)
            .await?;

        let balance = self.finance.adjust_balance_in(&mut *tx, -amount).await?;

        tx.commit().await?;

        tracing::info!(
            "Salário de {} pago a {}, caixa em {}",
            amount,
            employee.name,
            balance.amount
        );
        Ok(payment)
    }

    pub async fn list_salary_payments(&self) -> Result<Vec<SalaryPayment>, AppError> {
        self.salary_repo.list_salary_payments().await
    }
}
