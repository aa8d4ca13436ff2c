// src/db/salary_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::salary::{Employee, SalaryPayment},
};

#[derive(Clone)]
pub struct SalaryRepository {
    pool: PgPool,
}

impl SalaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_employee<'e, E>(&self, executor: E, name: &str) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(employee)
    }

    pub async fn get_employee<'e, E>(
        &self,
        executor: E,
        employee_id: Uuid,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(employee_id)
            .fetch_optional(executor)
            .await?;
        Ok(employee)
    }

    pub async fn insert_salary_payment<'e, E>(
        &self,
        executor: E,
        employee_id: Uuid,
        amount: Decimal,
        note: Option<&str>,
    ) -> Result<SalaryPayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, SalaryPayment>(
            r#"
            INSERT INTO salary_payments (employee_id, amount, note)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(amount)
        .bind(note)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    pub async fn list_salary_payments(&self) -> Result<Vec<SalaryPayment>, AppError> {
        let payments = sqlx::query_as::<_, SalaryPayment>(
            "SELECT * FROM salary_payments ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }
}
