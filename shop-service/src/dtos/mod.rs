pub mod orders;
pub mod users;

pub use orders::OrderStatusUpdate;
pub use users::{email_filter, AdminStatus, UserRole};
