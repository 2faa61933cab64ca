//! A single timer run: argument assembly, countdown and expiry alerts.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use super::countdown::Countdown;
use super::display::{Display, TIME_FORMAT_HINT};
use crate::alert::AlertBackend;
use crate::dispatch::FallbackDispatcher;
use crate::duration;
use crate::types::{AlertConfig, AlertRequest, DispatchOutcome, Seconds};

/// Maximum length of the joined message, in bytes.
pub const MESSAGE_CAP: usize = 4096;

// ============================================================================
// TimerError
// ============================================================================

/// Errors that stop a timer before or during the countdown.
#[derive(Debug, Error)]
pub enum TimerError {
    /// Fewer than two positional arguments were given
    #[error("expected a time and a message")]
    MissingArguments,

    /// The time argument parsed to zero seconds
    #[error("Invalid time format: {0}\n{hint}", hint = TIME_FORMAT_HINT)]
    InvalidDuration(String),

    /// The alert configuration is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Writing the countdown failed
    #[error("failed to write countdown: {0}")]
    Output(#[from] io::Error),
}

impl TimerError {
    /// Returns true if the usage text should be shown for this error.
    pub fn is_usage(&self) -> bool {
        matches!(self, TimerError::MissingArguments)
    }
}

// ============================================================================
// TimerRequest
// ============================================================================

/// Positional arguments resolved into what to wait for and what to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRequest {
    /// Audio file to play at expiry
    pub audio_path: Option<PathBuf>,
    /// The time argument as typed
    pub time_text: String,
    /// The message words joined with spaces
    pub message: String,
}

impl TimerRequest {
    /// Resolves `[AUDIO] <TIME> <MESSAGE>...`.
    ///
    /// The first argument is the time if it starts with an ASCII digit, and
    /// the audio path otherwise.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::MissingArguments` if fewer than two arguments are
    /// given.
    pub fn from_positionals(args: &[String]) -> Result<Self, TimerError> {
        if args.len() < 2 {
            return Err(TimerError::MissingArguments);
        }

        let has_audio = !args[0].starts_with(|c: char| c.is_ascii_digit());
        let (audio_path, rest) = if has_audio {
            (Some(PathBuf::from(&args[0])), &args[1..])
        } else {
            (None, args)
        };

        Ok(Self {
            audio_path,
            time_text: rest[0].clone(),
            message: join_message(&rest[1..], MESSAGE_CAP),
        })
    }

    /// Replaces the audio path.
    #[must_use]
    pub fn with_audio_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.audio_path = path;
        }
        self
    }

    /// Parses the time argument.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidDuration` if it amounts to zero seconds.
    pub fn seconds(&self) -> Result<Seconds, TimerError> {
        match duration::parse(&self.time_text) {
            0 => Err(TimerError::InvalidDuration(self.time_text.clone())),
            seconds => Ok(seconds),
        }
    }
}

/// Joins words with single spaces, stopping before the word that would push
/// the result past `cap` bytes.
///
/// A single word longer than `cap` is cut at the last char boundary.
pub fn join_message<S: AsRef<str>>(words: &[S], cap: usize) -> String {
    let mut message = String::new();
    for (i, word) in words.iter().enumerate() {
        let word = word.as_ref();
        let sep = usize::from(i > 0);
        if message.len() + sep + word.len() > cap {
            if message.is_empty() {
                let mut end = cap.min(word.len());
                while !word.is_char_boundary(end) {
                    end -= 1;
                }
                message.push_str(&word[..end]);
            }
            break;
        }
        if sep == 1 {
            message.push(' ');
        }
        message.push_str(word);
    }
    message
}

// ============================================================================
// Running a timer
// ============================================================================

/// Runs a timer to completion and dispatches the expiry alerts.
///
/// Writes the header and countdown to `out`, sleeping with `sleep` between
/// ticks. Returns one outcome per dispatched alert (bell first).
///
/// # Errors
///
/// Returns an error if the time is invalid, the configuration does not
/// validate, or writing to `out` fails. Alert failures are never errors.
pub fn run_timer<B, W, S>(
    request: &TimerRequest,
    config: &AlertConfig,
    dispatcher: &FallbackDispatcher<B>,
    out: &mut W,
    sleep: S,
) -> Result<Vec<DispatchOutcome>, TimerError>
where
    B: AlertBackend,
    W: Write + ?Sized,
    S: FnMut(Duration),
{
    config.validate().map_err(TimerError::InvalidConfig)?;
    let total = request.seconds()?;

    Display::write_start(out, total, &request.message)?;
    Countdown::new(total, Duration::from_millis(config.tick_millis), sleep).run(out)?;

    info!("Timer expired after {} seconds", total);

    let mut outcomes = Vec::new();
    if config.sound {
        outcomes.push(dispatcher.dispatch(&AlertRequest::bell(request.audio_path.clone())));
    }
    if config.notification {
        outcomes.push(dispatcher.dispatch(&AlertRequest::Notification(
            config.completion_payload(&request.message),
        )));
    }
    Ok(outcomes)
}

// ============================================================================
// Tests
// ============================================================================
