//! # Error Types
//!
//! Error handling for the session core.
//!
//! This module defines all error variants that can occur while operating a
//! group session, from per-packet decode failures to lifecycle guard
//! violations.
//!
//! ## Error Categories
//! - **Lifecycle Errors**: Group creation/join guards and failures
//! - **Codec Errors**: Message encode/decode failures
//! - **Transport Errors**: Unavailable or failing transport capability
//! - **Configuration Errors**: Invalid or unreadable configuration
//!
//! Nothing here is fatal to the host process: every variant degrades to a
//! logged warning, and session state stays consistent (Idle or the previous
//! valid state, never partially updated).

use thiserror::Error;

use crate::transport::ResponseCode;

/// SessionError is the primary error type for all session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A group is already active; leave it before creating or joining another")]
    GroupAlreadyActive,

    #[error("No group is active")]
    GroupNotActive,

    #[error("Group creation failed: {0}")]
    GroupCreationFailed(String),

    #[error("Group join failed: {0:?}")]
    GroupJoinFailed(ResponseCode),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Transport is not ready")]
    TransportUnavailable,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using SessionError
pub type Result<T> = std::result::Result<T, SessionError>;
