//! Alert mechanisms backed by external programs.
//!
//! Each mechanism names one program and how to build its arguments. The
//! program is looked up on `PATH` at invocation time; a missing program is
//! reported as unavailable so the chain can move on.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use super::error::AlertError;
use crate::types::NotificationPayload;

/// How a spawned program is treated once it has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Success means the program was launched; it keeps running on its own.
    Detached,
    /// Success means the program exited with status zero.
    Wait,
}

// ============================================================================
// ProgramLocator
// ============================================================================

/// Finds executables for mechanisms.
///
/// Uses the process `PATH` by default. A custom search path can be set, which
/// is how tests point mechanisms at stand-in programs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramLocator {
    search_path: Option<OsString>,
}

impl ProgramLocator {
    /// Creates a locator that searches the process `PATH`.
    #[must_use]
    pub fn system() -> Self {
        Self::default()
    }

    /// Creates a locator that searches only the given path list.
    #[must_use]
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    /// Resolves a program name to an executable path.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::MechanismUnavailable` if the program is not found.
    pub fn locate(&self, mechanism: &str, program: &str) -> Result<PathBuf, AlertError> {
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(program, Some(paths), cwd)
            }
            None => which::which(program),
        };
        found.map_err(|e| AlertError::MechanismUnavailable(mechanism.to_string(), e.to_string()))
    }

    /// Returns true if the program can be found.
    #[must_use]
    pub fn exists(&self, program: &str) -> bool {
        self.locate(program, program).is_ok()
    }
}

/// Runs `program` with `args` according to `mode`.
///
/// `on_failure` builds the error for a program that ran but failed.
fn launch(
    locator: &ProgramLocator,
    mechanism: &str,
    program: &str,
    args: &[OsString],
    mode: LaunchMode,
    on_failure: fn(String, String) -> AlertError,
) -> Result<(), AlertError> {
    let executable = locator.locate(mechanism, program)?;
    debug!("Launching {} ({:?})", executable.display(), mode);

    let mut command = Command::new(&executable);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match mode {
        LaunchMode::Detached => command
            .spawn()
            .map(drop)
            .map_err(|e| spawn_error(mechanism, e, on_failure)),
        LaunchMode::Wait => {
            let status = command
                .status()
                .map_err(|e| spawn_error(mechanism, e, on_failure))?;
            check_status(mechanism, status, on_failure)
        }
    }
}

fn spawn_error(
    mechanism: &str,
    error: io::Error,
    on_failure: fn(String, String) -> AlertError,
) -> AlertError {
    match error.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            AlertError::MechanismUnavailable(mechanism.to_string(), error.to_string())
        }
        _ => on_failure(mechanism.to_string(), error.to_string()),
    }
}

fn check_status(
    mechanism: &str,
    status: ExitStatus,
    on_failure: fn(String, String) -> AlertError,
) -> Result<(), AlertError> {
    if status.success() {
        Ok(())
    } else {
        Err(on_failure(mechanism.to_string(), status.to_string()))
    }
}

// ============================================================================
// CommandPlayer
// ============================================================================

/// Plays an audio file through an external player program.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    name: &'static str,
    program: &'static str,
    args: fn(&Path) -> Vec<OsString>,
    mode: LaunchMode,
}

impl CommandPlayer {
    /// Creates a player mechanism.
    #[must_use]
    pub const fn new(
        name: &'static str,
        program: &'static str,
        args: fn(&Path) -> Vec<OsString>,
        mode: LaunchMode,
    ) -> Self {
        Self {
            name,
            program,
            args,
            mode,
        }
    }

    /// Returns the mechanism name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the program this player runs.
    #[must_use]
    pub fn program(&self) -> &'static str {
        self.program
    }

    /// Returns how the player process is treated after launch.
    #[must_use]
    pub fn mode(&self) -> LaunchMode {
        self.mode
    }

    /// Builds the argument list for a file.
    #[must_use]
    pub fn args_for(&self, path: &Path) -> Vec<OsString> {
        (self.args)(path)
    }

    /// Plays `path` with this player.
    ///
    /// # Errors
    ///
    /// Returns `MechanismUnavailable` if the player cannot be found or
    /// started, `PlaybackFailed` if it ran and reported failure.
    pub fn play_audio_file(&self, locator: &ProgramLocator, path: &Path) -> Result<(), AlertError> {
        launch(
            locator,
            self.name,
            self.program,
            &self.args_for(path),
            self.mode,
            AlertError::PlaybackFailed,
        )
    }
}

// ============================================================================
// CommandNotifier
// ============================================================================

/// Shows a desktop notification through an external program.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    name: &'static str,
    program: &'static str,
    args: fn(&NotificationPayload) -> Vec<OsString>,
}

impl CommandNotifier {
    /// Creates a notifier mechanism.
    #[must_use]
    pub const fn new(
        name: &'static str,
        program: &'static str,
        args: fn(&NotificationPayload) -> Vec<OsString>,
    ) -> Self {
        Self {
            name,
            program,
            args,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn program(&self) -> &'static str {
        self.program
    }

    /// Builds the argument list for a payload.
    #[must_use]
    pub fn args_for(&self, payload: &NotificationPayload) -> Vec<OsString> {
        (self.args)(payload)
    }

    /// Shows `payload` through this notifier and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `MechanismUnavailable` if the notifier cannot be found or
    /// started, `NotificationFailed` if it exited with a failure status.
    pub fn show_notification(
        &self,
        locator: &ProgramLocator,
        payload: &NotificationPayload,
    ) -> Result<(), AlertError> {
        launch(
            locator,
            self.name,
            self.program,
            &self.args_for(payload),
            LaunchMode::Wait,
            AlertError::NotificationFailed,
        )
    }
}

// ============================================================================
// SystemBell
// ============================================================================

/// A program that plays the operating system's alert sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemBell {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl SystemBell {
    /// Runs the bell program and waits for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is missing or exits with failure.
    pub fn ring(&self, locator: &ProgramLocator) -> Result<(), AlertError> {
        let args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        launch(
            locator,
            "system-bell",
            self.program,
            &args,
            LaunchMode::Wait,
            AlertError::PlaybackFailed,
        )
    }
}
