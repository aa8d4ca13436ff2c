pub mod dashboard_service;
pub mod finance_service;
pub mod inventory_service;
pub mod orders_service;
pub mod salary_service;
pub mod shops_service;

pub use dashboard_service::DashboardService;
pub use finance_service::FinanceService;
pub use inventory_service::InventoryService;
pub use orders_service::OrdersService;
pub use salary_service::SalaryService;
pub use shops_service::ShopsService;
