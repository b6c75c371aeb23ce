//! # Configuration Management
//!
//! Centralized configuration for the session core.
//!
//! This module provides structured configuration for a session controller,
//! including the group member limit, the per-tick drain bound, and the wire
//! format.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::serialization::SerializationFormat;
use crate::error::{Result, SessionError};

/// Reserved tag a newly joined peer broadcasts to announce itself.
pub const HANDSHAKE_TAG: &str = "handshake";

/// Default cap on packets processed per tick. Bounds per-tick work under
/// burst load; unread packets stay buffered in the transport until the next
/// tick.
pub const DEFAULT_MAX_PACKETS_PER_TICK: usize = 32;

/// Default member limit requested on group creation.
pub const DEFAULT_MEMBER_LIMIT: u32 = 8;

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Member limit requested when creating a group
    #[serde(default = "default_member_limit")]
    pub member_limit: u32,

    /// Maximum packets the pump processes per tick
    #[serde(default = "default_max_packets")]
    pub max_packets_per_tick: usize,

    /// Wire format for outbound messages
    #[serde(default)]
    pub format: SerializationFormat,

    /// Human-readable group name written into group metadata on creation
    #[serde(default = "default_group_name")]
    pub group_name: String,
}

fn default_member_limit() -> u32 {
    DEFAULT_MEMBER_LIMIT
}

fn default_max_packets() -> usize {
    DEFAULT_MAX_PACKETS_PER_TICK
}

fn default_group_name() -> String {
    "peer-session group".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            member_limit: DEFAULT_MEMBER_LIMIT,
            max_packets_per_tick: DEFAULT_MAX_PACKETS_PER_TICK,
            format: SerializationFormat::default(),
            group_name: default_group_name(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| SessionError::Config(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| SessionError::Config(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| SessionError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(limit) = std::env::var("PEER_SESSION_MEMBER_LIMIT") {
            if let Ok(val) = limit.parse::<u32>() {
                config.member_limit = val;
            }
        }

        if let Ok(bound) = std::env::var("PEER_SESSION_MAX_PACKETS_PER_TICK") {
            if let Ok(val) = bound.parse::<usize>() {
                config.max_packets_per_tick = val;
            }
        }

        if let Ok(name) = std::env::var("PEER_SESSION_GROUP_NAME") {
            config.group_name = name;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Validate the configuration for common misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means the
    /// configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.member_limit == 0 {
            errors.push("member_limit must be at least 1".to_string());
        }

        if self.max_packets_per_tick == 0 {
            errors.push("max_packets_per_tick must be at least 1".to_string());
        }

        if self.group_name.is_empty() {
            errors.push("group_name must not be empty".to_string());
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SessionError::Config(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}
