//! Core data types for the notify timer.
//!
//! This module defines the data structures used for:
//! - Duration values passed between the parser, formatter and countdown
//! - Alert configuration with validation
//! - Alert requests and dispatch outcomes

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A duration expressed as a whole number of seconds.
pub type Seconds = u64;

/// Default notification source when none (or an empty one) is given.
pub const DEFAULT_SOURCE: &str = "Notify";

/// Default notification title when none (or an empty one) is given.
pub const DEFAULT_TITLE: &str = "Notification";

/// Title used for the notification sent when the countdown completes.
pub const TIMER_COMPLETE_TITLE: &str = "Timer Complete";

// ============================================================================
// AlertConfig
// ============================================================================

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_title() -> String {
    TIMER_COMPLETE_TITLE.to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_tick_millis() -> u64 {
    1000
}

/// Configuration for the alerts raised when a countdown expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Application name shown as the notification source
    #[serde(default = "default_source")]
    pub source: String,
    /// Notification title
    #[serde(default = "default_title")]
    pub title: String,
    /// Whether to play a sound at expiry
    #[serde(default = "default_enabled")]
    pub sound: bool,
    /// Whether to show a desktop notification at expiry
    #[serde(default = "default_enabled")]
    pub notification: bool,
    /// Length of one countdown tick in milliseconds (1-60000)
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            title: default_title(),
            sound: true,
            notification: true,
            tick_millis: default_tick_millis(),
        }
    }
}

impl AlertConfig {
    /// Sets the notification source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the notification title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enables or disables the expiry sound.
    #[must_use]
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound = enabled;
        self
    }

    /// Enables or disables the expiry notification.
    #[must_use]
    pub fn with_notification(mut self, enabled: bool) -> Self {
        self.notification = enabled;
        self
    }

    /// Sets the tick length in milliseconds.
    #[must_use]
    pub fn with_tick_millis(mut self, millis: u64) -> Self {
        self.tick_millis = millis;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_millis < 1 || self.tick_millis > 60_000 {
            return Err("tick length must be between 1 and 60000 milliseconds".to_string());
        }
        Ok(())
    }

    /// Builds the notification payload for a completed timer.
    #[must_use]
    pub fn completion_payload(&self, message: &str) -> NotificationPayload {
        NotificationPayload::new(&self.source, &self.title, message)
    }
}

// ============================================================================
// Alert requests
// ============================================================================

/// Content of a desktop notification.
///
/// Empty fields are replaced with defaults on construction, so a payload is
/// always displayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    source: String,
    title: String,
    message: String,
}

impl NotificationPayload {
    /// Creates a payload, applying defaults for empty source and title.
    #[must_use]
    pub fn new(source: &str, title: &str, message: &str) -> Self {
        Self {
            source: non_empty_or(source, DEFAULT_SOURCE),
            title: non_empty_or(title, DEFAULT_TITLE),
            message: message.to_string(),
        }
    }

    /// Returns the application name the notification is attributed to.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renders the payload as a single console line.
    #[must_use]
    pub fn console_line(&self) -> String {
        format!("[{}] {}: {}", self.source, self.title, self.message)
    }
}

impl Default for NotificationPayload {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// The two kinds of alert the dispatcher knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Bell,
    Notification,
}

impl AlertKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Bell => "bell",
            AlertKind::Notification => "notification",
        }
    }
}

/// A single alert to be delivered once and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertRequest {
    /// Audible alert, optionally backed by an audio file.
    Bell { audio_path: Option<PathBuf> },
    /// Desktop notification.
    Notification(NotificationPayload),
}

impl AlertRequest {
    /// Creates a bell request.
    #[must_use]
    pub fn bell(audio_path: Option<PathBuf>) -> Self {
        Self::Bell { audio_path }
    }

    /// Creates a notification request with defaults applied.
    #[must_use]
    pub fn notification(source: &str, title: &str, message: &str) -> Self {
        Self::Notification(NotificationPayload::new(source, title, message))
    }

    /// Returns the kind of this request.
    pub fn kind(&self) -> AlertKind {
        match self {
            Self::Bell { .. } => AlertKind::Bell,
            Self::Notification(_) => AlertKind::Notification,
        }
    }
}

// ============================================================================
// DispatchOutcome
// ============================================================================

/// A mechanism that was tried and failed during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAttempt {
    pub mechanism: String,
    pub error: String,
}

/// Record of how an alert was delivered.
///
/// Dispatch never fails, so an outcome always names the mechanism that
/// delivered the alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Kind of the dispatched request
    pub kind: AlertKind,
    /// Name of the mechanism that succeeded
    pub mechanism: String,
    /// True when the always-available last resort delivered the alert
    #[serde(rename = "lastResort")]
    pub last_resort: bool,
    /// Mechanisms tried before the successful one, in order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<FailedAttempt>,
}

impl DispatchOutcome {
    /// Creates an outcome delivered by a regular chain mechanism.
    #[must_use]
    pub fn delivered(kind: AlertKind, mechanism: impl Into<String>) -> Self {
        Self {
            kind,
            mechanism: mechanism.into(),
            last_resort: false,
            failures: Vec::new(),
        }
    }

    /// Creates an outcome delivered by the last-resort mechanism.
    #[must_use]
    pub fn last_resort(kind: AlertKind, mechanism: impl Into<String>) -> Self {
        Self {
            last_resort: true,
            ..Self::delivered(kind, mechanism)
        }
    }

    /// Attaches the failed attempts that preceded delivery.
    #[must_use]
    pub fn with_failures(mut self, failures: Vec<FailedAttempt>) -> Self {
        self.failures = failures;
        self
    }

    /// Returns true if a mechanism is recorded as having delivered the alert.
    pub fn succeeded(&self) -> bool {
        !self.mechanism.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
