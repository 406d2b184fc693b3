pub mod customer;
pub mod driver;
pub mod table;

pub use customer::{CustomerStore, InMemoryCustomerStore};
pub use driver::{DriverStore, InMemoryDriverStore};
