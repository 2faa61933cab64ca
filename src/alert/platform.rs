//! Platform alert backends.
//!
//! Each supported platform is described by a [`CommandBackend`]: the audio
//! players and notifiers to try, in priority order, plus the system bell
//! programs. [`default_backend`] picks the description for the platform
//! the binary was compiled for; any of them can be built on any platform,
//! which keeps them testable.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use super::command::{CommandNotifier, CommandPlayer, LaunchMode, ProgramLocator, SystemBell};
use super::error::AlertError;
use super::mechanism::{Mechanism, MechanismChain};
use super::AlertBackend;
use crate::types::NotificationPayload;

/// The terminal bell control character.
pub const BELL: &str = "\x07";

/// Writes the terminal bell character and flushes.
///
/// Write errors are ignored: a terminal that cannot ring is not worth
/// failing over.
pub fn ring_terminal_bell<W: Write + ?Sized>(out: &mut W) {
    if let Err(e) = out.write_all(BELL.as_bytes()).and_then(|()| out.flush()) {
        debug!("Terminal bell write failed: {}", e);
    }
}

// ============================================================================
// Argument builders
// ============================================================================

fn path_arg(path: &Path) -> Vec<OsString> {
    vec![path.as_os_str().to_owned()]
}

fn mplayer_args(path: &Path) -> Vec<OsString> {
    vec![OsString::from("-really-quiet"), path.as_os_str().to_owned()]
}

fn cvlc_args(path: &Path) -> Vec<OsString> {
    vec![
        OsString::from("--play-and-exit"),
        path.as_os_str().to_owned(),
    ]
}

fn notify_send_args(payload: &NotificationPayload) -> Vec<OsString> {
    vec![
        OsString::from("-a"),
        OsString::from(payload.source()),
        OsString::from(payload.title()),
        OsString::from(payload.message()),
    ]
}

fn kdialog_args(payload: &NotificationPayload) -> Vec<OsString> {
    vec![
        OsString::from("--title"),
        OsString::from(payload.title()),
        OsString::from("--passivepopup"),
        OsString::from(payload.message()),
        OsString::from("5"),
    ]
}

fn terminal_notifier_args(payload: &NotificationPayload) -> Vec<OsString> {
    vec![
        OsString::from("-title"),
        OsString::from(payload.title()),
        OsString::from("-subtitle"),
        OsString::from(payload.source()),
        OsString::from("-message"),
        OsString::from(payload.message()),
    ]
}

/// Escapes text for use inside an AppleScript string literal.
fn applescript_escape(text: &str) -> String {
    text.replace('\\', r"\\").replace('"', r#"\""#)
}

fn osascript_args(payload: &NotificationPayload) -> Vec<OsString> {
    let script = format!(
        r#"display notification "{}" with title "{}" subtitle "{}""#,
        applescript_escape(payload.message()),
        applescript_escape(payload.title()),
        applescript_escape(payload.source()),
    );
    vec![OsString::from("-e"), OsString::from(script)]
}

/// Escapes text for use inside a PowerShell single-quoted string.
fn powershell_escape(text: &str) -> String {
    text.replace('\'', "''")
}

fn powershell_player_args(path: &Path) -> Vec<OsString> {
    let script = format!(
        "(New-Object Media.SoundPlayer '{}').PlaySync()",
        powershell_escape(&path.to_string_lossy())
    );
    vec![
        OsString::from("-NoProfile"),
        OsString::from("-Command"),
        OsString::from(script),
    ]
}

fn powershell_toast_args(payload: &NotificationPayload) -> Vec<OsString> {
    let script = format!(
        "[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; \
         $template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02); \
         $text = $template.GetElementsByTagName('text'); \
         $text[0].AppendChild($template.CreateTextNode('{}')) | Out-Null; \
         $text[1].AppendChild($template.CreateTextNode('{}')) | Out-Null; \
         [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{}').Show([Windows.UI.Notifications.ToastNotification]::new($template))",
        powershell_escape(payload.title()),
        powershell_escape(payload.message()),
        powershell_escape(payload.source()),
    );
    vec![
        OsString::from("-NoProfile"),
        OsString::from("-Command"),
        OsString::from(script),
    ]
}

// ============================================================================
// CommandBackend
// ============================================================================

/// An alert backend that drives external programs.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    name: &'static str,
    locator: ProgramLocator,
    players: Vec<CommandPlayer>,
    notifiers: Vec<CommandNotifier>,
    system_bells: Vec<SystemBell>,
    always_ring_terminal: bool,
    native_audio: bool,
}

impl CommandBackend {
    /// Backend for Linux and BSD desktops (ALSA/PulseAudio, freedesktop
    /// notifications).
    #[must_use]
    pub fn freedesktop() -> Self {
        Self {
            name: "freedesktop",
            locator: ProgramLocator::system(),
            players: vec![
                CommandPlayer::new("aplay", "aplay", path_arg, LaunchMode::Detached),
                CommandPlayer::new("paplay", "paplay", path_arg, LaunchMode::Detached),
                CommandPlayer::new("play", "play", path_arg, LaunchMode::Wait),
                CommandPlayer::new("mplayer", "mplayer", mplayer_args, LaunchMode::Detached),
                CommandPlayer::new("cvlc", "cvlc", cvlc_args, LaunchMode::Detached),
            ],
            notifiers: vec![
                CommandNotifier::new("notify-send", "notify-send", notify_send_args),
                CommandNotifier::new("kdialog", "kdialog", kdialog_args),
            ],
            system_bells: vec![
                SystemBell {
                    program: "beep",
                    args: &[],
                },
                SystemBell {
                    program: "pactl",
                    args: &["play-sample", "bell-terminal"],
                },
            ],
            always_ring_terminal: true,
            native_audio: true,
        }
    }

    /// Backend for macOS.
    #[must_use]
    pub fn macos() -> Self {
        Self {
            name: "macos",
            locator: ProgramLocator::system(),
            players: vec![CommandPlayer::new(
                "afplay",
                "afplay",
                path_arg,
                LaunchMode::Detached,
            )],
            notifiers: vec![
                CommandNotifier::new(
                    "terminal-notifier",
                    "terminal-notifier",
                    terminal_notifier_args,
                ),
                CommandNotifier::new("osascript", "osascript", osascript_args),
            ],
            system_bells: vec![SystemBell {
                program: "osascript",
                args: &["-e", "beep"],
            }],
            always_ring_terminal: false,
            native_audio: true,
        }
    }

    /// Backend for Windows.
    #[must_use]
    pub fn windows() -> Self {
        Self {
            name: "windows",
            locator: ProgramLocator::system(),
            players: vec![CommandPlayer::new(
                "powershell-soundplayer",
                "powershell",
                powershell_player_args,
                LaunchMode::Wait,
            )],
            notifiers: vec![CommandNotifier::new(
                "powershell-toast",
                "powershell",
                powershell_toast_args,
            )],
            system_bells: vec![SystemBell {
                program: "powershell",
                args: &["-NoProfile", "-Command", "[System.Media.SystemSounds]::Beep.Play()"],
            }],
            always_ring_terminal: false,
            native_audio: true,
        }
    }

    /// Replaces the program locator.
    #[must_use]
    pub fn with_locator(mut self, locator: ProgramLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Enables or disables the in-process player (only present with the
    /// `native-audio` feature).
    #[must_use]
    pub fn with_native_audio(mut self, enabled: bool) -> Self {
        self.native_audio = enabled;
        self
    }

    #[must_use]
    pub fn players(&self) -> &[CommandPlayer] {
        &self.players
    }

    #[must_use]
    pub fn notifiers(&self) -> &[CommandNotifier] {
        &self.notifiers
    }

    /// Returns the system bell programs, in the order they are tried.
    #[must_use]
    pub fn system_bells(&self) -> &[SystemBell] {
        &self.system_bells
    }

    #[must_use]
    pub fn locator(&self) -> &ProgramLocator {
        &self.locator
    }

    #[cfg(feature = "native-audio")]
    fn push_native_player<'a>(&'a self, chain: &mut MechanismChain<'a, Path>) {
        use super::native::{NativePlayer, MECHANISM_NAME};

        if self.native_audio {
            chain.push(Mechanism::new(MECHANISM_NAME, |path: &Path| {
                NativePlayer::new()?.play_audio_file(path)
            }));
        }
    }

    #[cfg(not(feature = "native-audio"))]
    fn push_native_player<'a>(&'a self, _chain: &mut MechanismChain<'a, Path>) {
        if self.native_audio {
            debug!("Built without native-audio; skipping in-process player");
        }
    }
}

impl AlertBackend for CommandBackend {
    fn name(&self) -> &str {
        self.name
    }

    /// Rings the terminal bell and the first system bell program that works.
    ///
    /// On freedesktop systems the terminal bell is always written; elsewhere
    /// it is written only when no system bell program succeeds. Missing or
    /// failing bell programs are not errors.
    fn play_bell(&self, console: &mut dyn Write) -> Result<(), AlertError> {
        if self.always_ring_terminal {
            ring_terminal_bell(console);
        }

        for bell in &self.system_bells {
            match bell.ring(&self.locator) {
                Ok(()) => return Ok(()),
                Err(e) => debug!("System bell '{}' failed: {}", bell.program, e),
            }
        }

        if !self.always_ring_terminal {
            ring_terminal_bell(console);
        }
        Ok(())
    }

    fn audio_chain(&self) -> MechanismChain<'_, Path> {
        let mut chain = MechanismChain::new();
        for player in &self.players {
            chain.push(Mechanism::new(player.name(), move |path: &Path| {
                player.play_audio_file(&self.locator, path)
            }));
        }
        self.push_native_player(&mut chain);
        chain
    }

    fn notification_chain(&self) -> MechanismChain<'_, NotificationPayload> {
        let mut chain = MechanismChain::new();
        for notifier in &self.notifiers {
            chain.push(Mechanism::new(
                notifier.name(),
                move |payload: &NotificationPayload| {
                    notifier.show_notification(&self.locator, payload)
                },
            ));
        }
        chain
    }
}

/// Returns the backend for the platform this binary was built for.
#[must_use]
pub fn default_backend() -> CommandBackend {
    #[cfg(target_os = "macos")]
    {
        CommandBackend::macos()
    }

    #[cfg(windows)]
    {
        CommandBackend::windows()
    }

    #[cfg(not(any(target_os = "macos", windows)))]
    {
        CommandBackend::freedesktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated(backend: CommandBackend) -> (tempfile::TempDir, CommandBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend
            .with_locator(ProgramLocator::with_search_path(dir.path()))
            .with_native_audio(false);
        (dir, backend)
    }

    mod chain_order_tests {
        use super::*;

        #[test]
        fn test_freedesktop_player_order() {
            let backend = CommandBackend::freedesktop().with_native_audio(false);
            assert_eq!(
                backend.audio_chain().names(),
                vec!["aplay", "paplay", "play", "mplayer", "cvlc"]
            );
        }

        #[test]
        fn test_freedesktop_notifier_order() {
            let backend = CommandBackend::freedesktop();
            assert_eq!(
                backend.notification_chain().names(),
                vec!["notify-send", "kdialog"]
            );
        }

        #[test]
        fn test_macos_chains() {
            let backend = CommandBackend::macos().with_native_audio(false);
            assert_eq!(backend.audio_chain().names(), vec!["afplay"]);
            assert_eq!(
                backend.notification_chain().names(),
                vec!["terminal-notifier", "osascript"]
            );
        }

        #[test]
        fn test_windows_chains() {
            let backend = CommandBackend::windows().with_native_audio(false);
            assert_eq!(backend.audio_chain().names(), vec!["powershell-soundplayer"]);
            assert_eq!(
                backend.notification_chain().names(),
                vec!["powershell-toast"]
            );
        }

        #[cfg(feature = "native-audio")]
        #[test]
        fn test_native_player_is_last() {
            let backend = CommandBackend::freedesktop();
            assert_eq!(backend.audio_chain().names().last(), Some(&"rodio"));
        }

        #[test]
        fn test_default_backend_has_chains() {
            let backend = default_backend();
            assert!(!backend.players().is_empty());
            assert!(!backend.notifiers().is_empty());
            assert!(!backend.name().is_empty());
        }
    }

    mod argument_tests {
        use super::*;

        fn payload() -> NotificationPayload {
            NotificationPayload::new("Notify", "Timer \"Complete\"", "it's tea")
        }

        #[test]
        fn test_notify_send_args() {
            let args = notify_send_args(&payload());
            assert_eq!(
                args,
                vec!["-a", "Notify", "Timer \"Complete\"", "it's tea"]
                    .into_iter()
                    .map(OsString::from)
                    .collect::<Vec<_>>()
            );
        }

        #[test]
        fn test_osascript_escapes_quotes() {
            let args = osascript_args(&payload());
            let script = args[1].to_string_lossy().into_owned();
            assert!(script.contains(r#"with title "Timer \"Complete\"""#));
            assert!(script.starts_with(r#"display notification "it's tea""#));
        }

        #[test]
        fn test_powershell_escapes_single_quotes() {
            let args = powershell_toast_args(&payload());
            let script = args[2].to_string_lossy().into_owned();
            assert!(script.contains("'it''s tea'"));
            assert!(script.contains("CreateToastNotifier('Notify')"));
        }

        #[test]
        fn test_player_args() {
            let path = Path::new("/tmp/ding.wav");
            assert_eq!(path_arg(path), vec![OsString::from("/tmp/ding.wav")]);
            assert_eq!(cvlc_args(path)[0], OsString::from("--play-and-exit"));
            assert_eq!(mplayer_args(path).len(), 2);
            let ps = powershell_player_args(Path::new("/tmp/o'clock.wav"));
            assert!(ps[2].to_string_lossy().contains("'/tmp/o''clock.wav'"));
        }
    }

    mod behaviour_tests {
        use super::*;

        #[test]
        fn test_missing_players_all_unavailable() {
            let (_dir, backend) = isolated(CommandBackend::freedesktop());
            let run = backend.audio_chain().run(Path::new("/tmp/ding.wav"));
            assert!(run.succeeded.is_none());
            assert_eq!(run.failures.len(), 5);
        }

        #[test]
        fn test_missing_notifiers_all_unavailable() {
            let (_dir, backend) = isolated(CommandBackend::freedesktop());
            let run = backend
                .notification_chain()
                .run(&NotificationPayload::default());
            assert!(run.succeeded.is_none());
            assert_eq!(run.failures.len(), 2);
        }

        #[test]
        fn test_bell_always_succeeds() {
            let (_dir, backend) = isolated(CommandBackend::macos());
            let mut console = Vec::<u8>::new();
            // osascript cannot be found, so the terminal bell is used.
            assert!(backend.play_bell(&mut console).is_ok());
            assert_eq!(console, b"\x07");

            let (_dir, backend) = isolated(CommandBackend::freedesktop());
            let mut console = Vec::<u8>::new();
            assert!(backend.play_bell(&mut console).is_ok());
            assert_eq!(console, b"\x07");
        }

        #[test]
        fn test_freedesktop_bell_programs_in_order() {
            let programs: Vec<_> = CommandBackend::freedesktop()
                .system_bells()
                .iter()
                .map(|b| b.program)
                .collect();
            assert_eq!(programs, vec!["beep", "pactl"]);
            assert_eq!(
                CommandBackend::freedesktop().system_bells()[1].args,
                &["play-sample", "bell-terminal"]
            );
        }

        #[cfg(unix)]
        #[test]
        fn test_freedesktop_bell_runs_beep_and_terminal_bell() {
            use std::os::unix::fs::PermissionsExt;

            let (dir, backend) = isolated(CommandBackend::freedesktop());
            let marker = dir.path().join("beeped");
            let script = dir.path().join("beep");
            std::fs::write(
                &script,
                format!("#!/bin/sh\ntouch '{}'\n", marker.display()),
            )
            .unwrap();
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

            let mut console = Vec::<u8>::new();
            assert!(backend.play_bell(&mut console).is_ok());
            assert!(marker.exists());
            assert_eq!(console, b"\x07");
        }

        #[cfg(unix)]
        #[test]
        fn test_freedesktop_bell_falls_back_to_pactl() {
            use std::os::unix::fs::PermissionsExt;

            let (dir, backend) = isolated(CommandBackend::freedesktop());
            let args_file = dir.path().join("pactl-args");
            let write = |name: &str, body: String| {
                let path = dir.path().join(name);
                std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            };
            write("beep", "exit 1".to_string());
            write(
                "pactl",
                format!("printf '%s ' \"$@\" > '{}'", args_file.display()),
            );

            assert!(backend.play_bell(&mut Vec::<u8>::new()).is_ok());
            let args = std::fs::read_to_string(args_file).unwrap();
            assert_eq!(args, "play-sample bell-terminal ");
        }

        #[test]
        fn test_ring_terminal_bell_writes_bel() {
            let mut out = Vec::<u8>::new();
            ring_terminal_bell(&mut out);
            assert_eq!(out, b"\x07");
        }
    }
}
