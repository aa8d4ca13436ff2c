// src/db/shops_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::ShopLoanEntry,
    models::shops::{Region, Shop},
};

#[derive(Clone)]
pub struct ShopsRepository {
    pool: PgPool,
}

impl ShopsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras simples usam a pool principal.
    // ---

    pub async fn list_shops(&self) -> Result<Vec<Shop>, AppError> {
        let shops = sqlx::query_as::<_, Shop>("SELECT * FROM shops ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(shops)
    }

    pub async fn list_shop_loans(&self) -> Result<Vec<ShopLoanEntry>, AppError> {
        let loans = sqlx::query_as::<_, ShopLoanEntry>(
            r#"
            SELECT id AS shop_id, name AS shop_name, loan_balance
            FROM shops
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    // ---
    // Escritas recebem um executor genérico para rodar dentro de transações.
    // ---

    pub async fn create_region<'e, E>(&self, executor: E, name: &str) -> Result<Region, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let region = sqlx::query_as::<_, Region>(
            "INSERT INTO regions (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(region)
    }

    pub async fn create_shop<'e, E>(
        &self,
        executor: E,
        region_id: Uuid,
        name: &str,
        owner_name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Shop, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shop = sqlx::query_as::<_, Shop>(
            r#"
            INSERT INTO shops (region_id, name, owner_name, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(region_id)
        .bind(name)
        .bind(owner_name)
        .bind(phone)
        .bind(address)
        .fetch_one(executor)
        .await?;
        Ok(shop)
    }

    /// Busca a loja travando a linha (FOR UPDATE). Duas reconciliações
    /// concorrentes para a mesma loja serializam aqui.
    pub async fn get_shop_for_update<'e, E>(
        &self,
        executor: E,
        shop_id: Uuid,
    ) -> Result<Option<Shop>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shop = sqlx::query_as::<_, Shop>("SELECT * FROM shops WHERE id = $1 FOR UPDATE")
            .bind(shop_id)
            .fetch_optional(executor)
            .await?;
        Ok(shop)
    }

    pub async fn update_loan_balance<'e, E>(
        &self,
        executor: E,
        shop_id: Uuid,
        loan_balance: Decimal,
    ) -> Result<Shop, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shop = sqlx::query_as::<_, Shop>(
            "UPDATE shops SET loan_balance = $2 WHERE id = $1 RETURNING *",
        )
        .bind(shop_id)
        .bind(loan_balance)
        .fetch_one(executor)
        .await?;
        Ok(shop)
    }
}
