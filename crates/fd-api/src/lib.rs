pub mod auth;
pub mod card;
pub mod config;
pub mod dashboard;
pub mod deck;
pub mod error;
pub mod generate;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;
pub mod study;
pub mod tracing;
pub mod validation;
pub mod views;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
