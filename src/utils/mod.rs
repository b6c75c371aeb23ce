//! # Utility Modules
//!
//! Supporting utilities shared across the crate.
//!
//! ## Components
//! - **Logging**: Structured logging configuration

pub mod logging;
