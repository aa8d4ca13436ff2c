// src/services/dashboard_service.rs
//
// Agregação de leitura para o painel. Retrato consistente-o-suficiente:
// cada número sai de uma consulta própria, sem transação longa.

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{FinanceRepository, InventoryRepository, OrdersRepository, ShopsRepository},
    models::dashboard::BalanceSnapshot,
};

#[derive(Clone)]
pub struct DashboardService {
    finance_repo: FinanceRepository,
    orders_repo: OrdersRepository,
    shops_repo: ShopsRepository,
    inventory_repo: InventoryRepository,
}

impl DashboardService {
    pub fn new(
        finance_repo: FinanceRepository,
        orders_repo: OrdersRepository,
        shops_repo: ShopsRepository,
        inventory_repo: InventoryRepository,
    ) -> Self {
        Self {
            finance_repo,
            orders_repo,
            shops_repo,
            inventory_repo,
        }
    }

    pub async fn balance_snapshot(&self) -> Result<BalanceSnapshot, AppError> {
        let balance = self.finance_repo.current_balance().await?;
        let shop_loans = self.shops_repo.list_shop_loans().await?;
        let total_loan: Decimal = shop_loans.iter().map(|s| s.loan_balance).sum();
        let stock_levels = self.inventory_repo.stock_levels().await?;
        let received_today = self.finance_repo.received_today().await?;
        let purchases_today = self.inventory_repo.purchases_today().await?;
        let stats = self.orders_repo.today_stats().await?;

        Ok(BalanceSnapshot {
            bakery_balance: balance.amount,
            total_loan,
            shop_loans,
            stock_levels,
            received_today,
            purchases_today,
            stats,
        })
    }
}
