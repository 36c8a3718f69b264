//! CLI command implementations.

mod config;
mod doctor;
mod insights;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use insights::run_insights;
pub use serve::run_serve;
