pub mod client;
pub mod health;
pub mod metrics;
pub mod ready;
