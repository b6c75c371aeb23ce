//! # Logging Setup
//!
//! Structured logging configuration helpers.
//!
//! The crate itself only emits `tracing` events; installing a subscriber is
//! the host's choice. Hosts that want output can call [`init`] once at
//! startup.

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global subscriber honoring `RUST_LOG`, defaulting to `info`.
///
/// Safe to call once per process. Returns an error if a subscriber is
/// already installed.
pub fn init() -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_target(true).finish();
    tracing::subscriber::set_global_default(subscriber)
}
