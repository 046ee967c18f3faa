//! HTTP Routes

pub mod estimates;
pub mod health;
pub mod metrics;
