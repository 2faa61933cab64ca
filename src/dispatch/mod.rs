//! Fallback dispatch of alert requests.
//!
//! The dispatcher turns an [`AlertRequest`] into a delivered alert. For both
//! kinds of alert the policy is the same: walk the backend's mechanism chain
//! in order, stop at the first success, and if nothing succeeds use a last
//! resort that cannot fail (the terminal bell, or a line on the console).
//!
//! # Example
//!
//! ```rust
//! use notify_timer::alert::MockAlertBackend;
//! use notify_timer::dispatch::FallbackDispatcher;
//! use notify_timer::types::AlertRequest;
//!
//! let dispatcher = FallbackDispatcher::new(MockAlertBackend::new()).with_console(Vec::<u8>::new());
//! let outcome = dispatcher.dispatch(&AlertRequest::bell(None));
//! assert!(outcome.succeeded());
//! ```

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::alert::{ring_terminal_bell, AlertBackend};
use crate::types::{AlertKind, AlertRequest, DispatchOutcome, FailedAttempt, NotificationPayload};

/// Mechanism name reported when the backend bell plays.
pub const BELL_MECHANISM: &str = "bell";

/// Mechanism name reported when the bell character is written to the console.
pub const TERMINAL_BELL_MECHANISM: &str = "terminal-bell";

/// Mechanism name reported when a notification is printed to the console.
pub const CONSOLE_MECHANISM: &str = "console";

/// Delivers alerts through a backend, falling back until something works.
pub struct FallbackDispatcher<B> {
    backend: B,
    console: RefCell<Box<dyn Write>>,
}

impl<B: AlertBackend> FallbackDispatcher<B> {
    /// Creates a dispatcher that prints its last-resort output to stdout.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            console: RefCell::new(Box::new(io::stdout())),
        }
    }

    /// Replaces the console used by last-resort mechanisms.
    #[must_use]
    pub fn with_console(self, console: impl Write + 'static) -> Self {
        Self {
            console: RefCell::new(Box::new(console)),
            ..self
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Delivers a request.
    ///
    /// Never fails: the returned outcome always names the mechanism that
    /// delivered the alert, possibly the last resort.
    pub fn dispatch(&self, request: &AlertRequest) -> DispatchOutcome {
        info!(
            "Dispatching {} alert via {} backend",
            request.kind().as_str(),
            self.backend.name()
        );

        match request {
            AlertRequest::Bell { audio_path } => self.dispatch_bell(audio_path.as_deref()),
            AlertRequest::Notification(payload) => self.dispatch_notification(payload),
        }
    }

    fn dispatch_bell(&self, audio_path: Option<&Path>) -> DispatchOutcome {
        let mut failures = Vec::new();

        match audio_path {
            Some(path) if is_readable_file(path) => {
                let run = self.backend.audio_chain().run(path);
                if let Some(mechanism) = run.succeeded {
                    return DispatchOutcome::delivered(AlertKind::Bell, mechanism)
                        .with_failures(run.failures);
                }
                warn!(
                    "No audio player could play {}, falling back to bell",
                    path.display()
                );
                failures = run.failures;
            }
            Some(path) => {
                debug!("Audio file {} is not readable, using bell", path.display());
            }
            None => {}
        }

        let fell_back = !failures.is_empty();
        let played = self.backend.play_bell(&mut **self.console.borrow_mut());
        match played {
            Ok(()) => {
                let outcome = if fell_back {
                    DispatchOutcome::last_resort(AlertKind::Bell, BELL_MECHANISM)
                } else {
                    DispatchOutcome::delivered(AlertKind::Bell, BELL_MECHANISM)
                };
                outcome.with_failures(failures)
            }
            Err(e) => {
                warn!("Bell failed, writing terminal bell: {}", e);
                failures.push(FailedAttempt {
                    mechanism: BELL_MECHANISM.to_string(),
                    error: e.to_string(),
                });
                ring_terminal_bell(&mut **self.console.borrow_mut());
                DispatchOutcome::last_resort(AlertKind::Bell, TERMINAL_BELL_MECHANISM)
                    .with_failures(failures)
            }
        }
    }

    fn dispatch_notification(&self, payload: &NotificationPayload) -> DispatchOutcome {
        let run = self.backend.notification_chain().run(payload);
        if let Some(mechanism) = run.succeeded {
            return DispatchOutcome::delivered(AlertKind::Notification, mechanism)
                .with_failures(run.failures);
        }

        warn!("No notifier succeeded, printing notification to console");
        self.print_to_console(payload);
        DispatchOutcome::last_resort(AlertKind::Notification, CONSOLE_MECHANISM)
            .with_failures(run.failures)
    }

    fn print_to_console(&self, payload: &NotificationPayload) {
        let mut console = self.console.borrow_mut();
        if let Err(e) = writeln!(console, "{}", payload.console_line()).and_then(|()| console.flush())
        {
            debug!("Console write failed: {}", e);
        }
    }
}

impl<B: std::fmt::Debug> std::fmt::Debug for FallbackDispatcher<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackDispatcher")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

/// Returns true if `path` names a regular file that can be opened.
fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
