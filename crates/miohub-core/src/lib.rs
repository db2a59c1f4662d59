//! Core configuration types for miohub.
//!
//! This crate holds the pieces shared between the device layer and the
//! binary: per-adapter configuration, the fleet configuration document
//! and the setup-time error taxonomy. Steady-state operational errors
//! (device unreachable, malformed response) live in `miohub-devices`;
//! everything here is fatal at setup and surfaced to the operator.

pub mod config;
pub mod error;

pub use config::{AdapterConfig, FleetConfig};
pub use error::ConfigError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
