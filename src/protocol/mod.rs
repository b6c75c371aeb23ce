//! # Session Protocol
//!
//! Lifecycle orchestration, membership tracking, and message routing.
//!
//! ## Components
//! - **Session**: group create/join/leave state machine and handshake flow
//! - **Membership**: full-replace member list with change observers
//! - **Pump**: bounded per-tick inbound drain
//! - **Dispatcher**: per-tag subscriber fan-out

pub mod dispatcher;
pub mod membership;
pub mod pump;
pub mod session;
