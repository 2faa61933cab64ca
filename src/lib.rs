//! Notify Timer Library
//!
//! This library provides the core functionality for the notify timer CLI.
//! It includes:
//! - Duration parsing and formatting
//! - Platform alert backends (audio players, notifiers, bell)
//! - Fallback dispatch of alerts across mechanism chains
//! - CLI command parsing, the countdown loop and display utilities
//! - Type definitions for configuration and alert requests

pub mod alert;
pub mod cli;
pub mod dispatch;
pub mod duration;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    AlertConfig, AlertKind, AlertRequest, DispatchOutcome, FailedAttempt, NotificationPayload,
    Seconds,
};

pub use alert::{
    default_backend, AlertBackend, AlertError, CommandBackend, MechanismChain, MockAlertBackend,
};

pub use dispatch::FallbackDispatcher;
