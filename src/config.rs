// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        FinanceRepository, InventoryRepository, OrdersRepository, SalaryRepository,
        ShopsRepository,
    },
    services::{
        DashboardService, FinanceService, InventoryService, OrdersService, SalaryService,
        ShopsService,
    },
};

#[derive(Clone)]
pub struct AppState {
    db_pool: PgPool,
    pub shops_service: ShopsService,
    pub orders_service: OrdersService,
    pub inventory_service: InventoryService,
    pub finance_service: FinanceService,
    pub salary_service: SalaryService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Estoque negativo no consumo de produção é tolerado por padrão
        // (a padaria registra a produção mesmo com contagem atrasada).
        let allow_negative_stock = env::var("ALLOW_NEGATIVE_STOCK")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let shops_repo = ShopsRepository::new(db_pool.clone());
        let orders_repo = OrdersRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let salary_repo = SalaryRepository::new(db_pool.clone());

        let finance_service = FinanceService::new(
            finance_repo.clone(),
            orders_repo.clone(),
            shops_repo.clone(),
        );
        let shops_service = ShopsService::new(db_pool.clone(), shops_repo.clone());
        let orders_service = OrdersService::new(
            db_pool.clone(),
            orders_repo.clone(),
            shops_repo.clone(),
            inventory_repo.clone(),
            finance_service.clone(),
        );
        let inventory_service = InventoryService::new(
            db_pool.clone(),
            inventory_repo.clone(),
            finance_service.clone(),
            allow_negative_stock,
        );
        let salary_service =
            SalaryService::new(db_pool.clone(), salary_repo.clone(), finance_service.clone());
        let dashboard_service = DashboardService::new(
            finance_repo.clone(),
            orders_repo.clone(),
            shops_repo.clone(),
            inventory_repo.clone(),
        );

        Ok(Self {
            db_pool,
            shops_service,
            orders_service,
            inventory_service,
            finance_service,
            salary_service,
            dashboard_service,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.db_pool
    }
}
