pub mod health;
pub mod metrics_handler;
pub mod quote;
pub mod rates;
pub mod reports;
