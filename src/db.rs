pub mod shops_repo;
pub use shops_repo::ShopsRepository;
pub mod orders_repo;
pub use orders_repo::OrdersRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod salary_repo;
pub use salary_repo::SalaryRepository;
