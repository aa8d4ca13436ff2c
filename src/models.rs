pub mod shops;
pub use shops::{Region, Shop};
pub mod orders;
pub use orders::{Order, OrderItem, OrderStatus};
pub mod inventory;
pub mod finance;
pub use finance::{BakeryBalance, LoanRepayment, Payment, PaymentType};
pub mod salary;
pub mod dashboard;
