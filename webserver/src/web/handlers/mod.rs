//! Request handlers

pub mod cycle;
pub mod health;

pub use cycle::trigger_cycle;
pub use health::health_check;
