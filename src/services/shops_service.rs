// src/services/shops_service.rs
//
// Cadastro de regiões e lojas. Caminho de seed, sem regra financeira.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ShopsRepository,
    models::shops::{Region, Shop},
};

#[derive(Clone)]
pub struct ShopsService {
    pool: PgPool,
    shops_repo: ShopsRepository,
}

impl ShopsService {
    pub fn new(pool: PgPool, shops_repo: ShopsRepository) -> Self {
        Self { pool, shops_repo }
    }

    pub async fn create_region(&self, name: &str) -> Result<Region, AppError> {
        self.shops_repo.create_region(&self.pool, name).await
    }

    pub async fn create_shop(
        &self,
        region_id: Uuid,
        name: &str,
        owner_name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Shop, AppError> {
        self.shops_repo
            .create_shop(&self.pool, region_id, name, owner_name, phone, address)
            .await
    }

    pub async fn list_shops(&self) -> Result<Vec<Shop>, AppError> {
        self.shops_repo.list_shops().await
    }
}
