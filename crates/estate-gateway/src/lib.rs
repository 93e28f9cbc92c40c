//! Estate Gateway - HTTP surface for the asset lifecycle
//!
//! Exposes the lifecycle operations on the legacy route names (`/submitPrice`,
//! `/makeOffer`, `/fundEscrow`, ...) with the legacy response texts. A
//! [`Gateway`] handle is constructed once from [`GatewayConfig`] and injected
//! into every handler.

#![forbid(unsafe_code)]

/// File and environment configuration
pub mod config;

/// Route handlers
pub mod handlers;

/// Tracing setup
pub mod logging;

/// Axum router
pub mod routes;

/// Shared gateway handle
pub mod state;

pub use config::{Backend, ConfigError, GatewayConfig};
pub use routes::router;
pub use state::Gateway;
