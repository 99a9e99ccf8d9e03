pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

pub use health::{health_check, hello, metrics, readiness_check};
