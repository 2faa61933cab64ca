//! Alert backends for the notify timer.
//!
//! This module provides the platform side of alert delivery:
//!
//! - Audio playback through external players (and optionally rodio)
//! - Desktop notifications through native notifier programs
//! - The terminal/system bell
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   AlertBackend   │ ← one per platform, injected into the dispatcher
//! └────────┬─────────┘
//!          │ builds
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │  MechanismChain  │────▶│ aplay, paplay,   │
//! │   (ordered)      │     │ play, mplayer... │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ notify-send,     │
//! └──────────────────┘     │ kdialog...       │
//!                          └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use notify_timer::alert::{default_backend, AlertBackend};
//!
//! let backend = default_backend();
//! let run = backend.audio_chain().run(Path::new("ding.wav"));
//! if run.succeeded.is_none() {
//!     backend.play_bell(&mut std::io::stdout()).ok();
//! }
//! ```

mod command;
mod error;
mod mechanism;
#[cfg(feature = "native-audio")]
mod native;
mod platform;

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use command::{CommandNotifier, CommandPlayer, LaunchMode, ProgramLocator, SystemBell};
pub use error::AlertError;
pub use mechanism::{ChainRun, Mechanism, MechanismChain};
#[cfg(feature = "native-audio")]
pub use native::NativePlayer;
pub use platform::{default_backend, ring_terminal_bell, CommandBackend, BELL};

use crate::types::NotificationPayload;

/// Platform capability for delivering alerts.
///
/// A backend exposes its mechanisms as ordered chains; it does not decide
/// what happens when a whole chain fails. That is the dispatcher's job.
pub trait AlertBackend {
    /// Returns a short backend name for logs.
    fn name(&self) -> &str;

    /// Plays a short, always-available audible cue.
    ///
    /// The terminal bell character, when used, is written to `console`.
    ///
    /// # Errors
    ///
    /// Only if the underlying OS primitive explicitly errors. Backends that
    /// print the bell character always return `Ok`.
    fn play_bell(&self, console: &mut dyn Write) -> Result<(), AlertError>;

    /// Returns the audio players to try for a file, in priority order.
    fn audio_chain(&self) -> MechanismChain<'_, Path>;

    /// Returns the notification channels to try, in priority order.
    fn notification_chain(&self) -> MechanismChain<'_, NotificationPayload>;
}

impl<B: AlertBackend + ?Sized> AlertBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn play_bell(&self, console: &mut dyn Write) -> Result<(), AlertError> {
        (**self).play_bell(console)
    }

    fn audio_chain(&self) -> MechanismChain<'_, Path> {
        (**self).audio_chain()
    }

    fn notification_chain(&self) -> MechanismChain<'_, NotificationPayload> {
        (**self).notification_chain()
    }
}

// ============================================================================
// MockAlertBackend
// ============================================================================

/// A call recorded by [`MockAlertBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Bell,
    AudioFile { mechanism: String, path: PathBuf },
    Notification {
        mechanism: String,
        payload: NotificationPayload,
    },
}

/// Mock alert backend for testing.
#[derive(Debug)]
pub struct MockAlertBackend {
    audio_players: Vec<String>,
    notifiers: Vec<String>,
    failing: Mutex<HashSet<String>>,
    unavailable: Mutex<HashSet<String>>,
    bell_should_fail: AtomicBool,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockAlertBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAlertBackend {
    /// Creates a mock with one audio player (`mock-player`) and one notifier
    /// (`mock-notifier`), both succeeding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            audio_players: vec!["mock-player".to_string()],
            notifiers: vec!["mock-notifier".to_string()],
            failing: Mutex::new(HashSet::new()),
            unavailable: Mutex::new(HashSet::new()),
            bell_should_fail: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the audio player names, in priority order.
    #[must_use]
    pub fn with_audio_players<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.audio_players = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the notifier names, in priority order.
    #[must_use]
    pub fn with_notifiers<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.notifiers = names.into_iter().map(Into::into).collect();
        self
    }

    /// Makes the named mechanism report failure after being invoked.
    pub fn set_should_fail(&self, mechanism: &str, should_fail: bool) {
        let mut failing = self.failing.lock().unwrap();
        if should_fail {
            failing.insert(mechanism.to_string());
        } else {
            failing.remove(mechanism);
        }
    }

    /// Makes the named mechanism report that it is not installed.
    pub fn set_unavailable(&self, mechanism: &str, unavailable: bool) {
        let mut set = self.unavailable.lock().unwrap();
        if unavailable {
            set.insert(mechanism.to_string());
        } else {
            set.remove(mechanism);
        }
    }

    /// Makes every configured audio player and notifier fail.
    pub fn fail_everything(&self) {
        for name in self.audio_players.iter().chain(&self.notifiers) {
            self.set_should_fail(name, true);
        }
    }

    pub fn set_bell_should_fail(&self, should_fail: bool) {
        self.bell_should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn bell_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Bell))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn outcome(
        &self,
        mechanism: &str,
        on_failure: fn(String, String) -> AlertError,
    ) -> Result<(), AlertError> {
        if self.unavailable.lock().unwrap().contains(mechanism) {
            return Err(AlertError::MechanismUnavailable(
                mechanism.to_string(),
                "mock not installed".to_string(),
            ));
        }
        if self.failing.lock().unwrap().contains(mechanism) {
            return Err(on_failure(mechanism.to_string(), "mock failure".to_string()));
        }
        Ok(())
    }
}

impl AlertBackend for MockAlertBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn play_bell(&self, _console: &mut dyn Write) -> Result<(), AlertError> {
        self.record(MockCall::Bell);
        if self.bell_should_fail.load(Ordering::SeqCst) {
            return Err(AlertError::PlaybackFailed(
                "bell".to_string(),
                "mock failure".to_string(),
            ));
        }
        Ok(())
    }

    fn audio_chain(&self) -> MechanismChain<'_, Path> {
        let mut chain = MechanismChain::new();
        for name in &self.audio_players {
            chain.push(Mechanism::new(name.clone(), move |path: &Path| {
                self.record(MockCall::AudioFile {
                    mechanism: name.clone(),
                    path: path.to_path_buf(),
                });
                self.outcome(name, AlertError::PlaybackFailed)
            }));
        }
        chain
    }

    fn notification_chain(&self) -> MechanismChain<'_, NotificationPayload> {
        let mut chain = MechanismChain::new();
        for name in &self.notifiers {
            chain.push(Mechanism::new(
                name.clone(),
                move |payload: &NotificationPayload| {
                    self.record(MockCall::Notification {
                        mechanism: name.clone(),
                        payload: payload.clone(),
                    });
                    self.outcome(name, AlertError::NotificationFailed)
                },
            ));
        }
        chain
    }
}
