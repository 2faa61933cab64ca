//! Command definitions for the notify timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::AlertConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Countdown timer that alerts you with a sound and a desktop notification
#[derive(Parser, Debug)]
#[command(
    name = "notify-timer",
    version,
    about = "Command-line countdown timer with sound and desktop notification",
    long_about = "Waits for the given time while showing a live countdown, then rings\n\
                  a sound and shows a desktop notification with your message.\n\n\
                  Time format examples: 1h30m, 90m, 3600s, 2h15m10s",
    override_usage = "notify-timer [OPTIONS] [AUDIO] <TIME> <MESSAGE>...\n       \
                      notify-timer completions <SHELL>",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub timer: TimerArgs,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Timer Arguments
// ============================================================================

/// Arguments for running a timer
#[derive(Args, Debug, Clone)]
pub struct TimerArgs {
    /// Optional audio file, the time (e.g. 1h30m) and the message
    ///
    /// Options must come before the time; every word after it belongs to
    /// the message, including words that start with `-`.
    #[arg(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
    pub positionals: Vec<String>,

    /// Audio file to play at expiry (overrides a positional AUDIO)
    #[arg(long, value_name = "PATH", conflicts_with = "no_sound")]
    pub sound: Option<PathBuf>,

    /// Do not play any sound at expiry
    #[arg(long)]
    pub no_sound: bool,

    /// Do not show a desktop notification at expiry
    #[arg(long)]
    pub no_notify: bool,

    /// Application name shown as the notification source
    #[arg(long, value_name = "NAME")]
    pub source: Option<String>,

    /// Notification title
    #[arg(long)]
    pub title: Option<String>,

    /// Print how each alert was delivered as JSON
    #[arg(long)]
    pub json: bool,

    /// Length of one countdown tick in milliseconds
    #[arg(
        long,
        hide = true,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    pub tick_millis: u64,
}

impl TimerArgs {
    /// Builds the alert configuration from the flags.
    pub fn alert_config(&self) -> AlertConfig {
        let mut config = AlertConfig::default()
            .with_sound(!self.no_sound)
            .with_notification(!self.no_notify)
            .with_tick_millis(self.tick_millis);
        if let Some(source) = &self.source {
            config = config.with_source(source.clone());
        }
        if let Some(title) = &self.title {
            config = config.with_title(title.clone());
        }
        config
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["notify-timer"]);
            assert!(cli.command.is_none());
            assert!(cli.timer.positionals.is_empty());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_time_and_message() {
            let cli = Cli::parse_from(["notify-timer", "5m", "Take", "a", "break!"]);
            assert!(cli.command.is_none());
            assert_eq!(cli.timer.positionals, vec!["5m", "Take", "a", "break!"]);
        }

        #[test]
        fn test_parse_message_words_starting_with_dash() {
            let cli = Cli::try_parse_from(["notify-timer", "5m", "-important", "call"]).unwrap();
            assert_eq!(cli.timer.positionals, vec!["5m", "-important", "call"]);

            let cli = Cli::try_parse_from(["notify-timer", "5m", "call", "--now", "-v"]).unwrap();
            assert_eq!(cli.timer.positionals, vec!["5m", "call", "--now", "-v"]);
            assert!(!cli.verbose);
        }

        #[test]
        fn test_options_before_time_are_still_flags() {
            let cli = Cli::try_parse_from(["notify-timer", "--json", "-v", "5m", "-x"]).unwrap();
            assert!(cli.timer.json);
            assert!(cli.verbose);
            assert_eq!(cli.timer.positionals, vec!["5m", "-x"]);
        }

        #[test]
        fn test_parse_audio_positional() {
            let cli = Cli::parse_from(["notify-timer", "ding.wav", "10s", "tea"]);
            assert_eq!(cli.timer.positionals.len(), 3);
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["notify-timer", "-v", "5m", "msg"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["notify-timer", "completions", "bash"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Bash
                })
            ));
        }

        #[test]
        fn test_verify_command() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
        }
    }

    mod timer_args_tests {
        use super::*;

        #[test]
        fn test_flags() {
            let cli = Cli::parse_from([
                "notify-timer",
                "--no-notify",
                "--source",
                "Kitchen",
                "--title",
                "Tea",
                "--json",
                "3m",
                "ready",
            ]);
            assert!(cli.timer.no_notify);
            assert!(cli.timer.json);
            assert_eq!(cli.timer.source.as_deref(), Some("Kitchen"));
            assert_eq!(cli.timer.title.as_deref(), Some("Tea"));
        }

        #[test]
        fn test_sound_conflicts_with_no_sound() {
            let result =
                Cli::try_parse_from(["notify-timer", "--sound", "a.wav", "--no-sound", "1s", "x"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_tick_millis_range() {
            assert!(Cli::try_parse_from(["notify-timer", "--tick-millis", "0", "1s", "x"]).is_err());
            let cli = Cli::parse_from(["notify-timer", "--tick-millis", "5", "1s", "x"]);
            assert_eq!(cli.timer.tick_millis, 5);
        }

        #[test]
        fn test_alert_config_defaults() {
            let cli = Cli::parse_from(["notify-timer", "1s", "x"]);
            assert_eq!(cli.timer.alert_config(), AlertConfig::default());
        }

        #[test]
        fn test_alert_config_from_flags() {
            let cli = Cli::parse_from([
                "notify-timer",
                "--no-sound",
                "--source",
                "Oven",
                "1s",
                "x",
            ]);
            let config = cli.timer.alert_config();
            assert!(!config.sound);
            assert!(config.notification);
            assert_eq!(config.source, "Oven");
            assert_eq!(config.title, "Timer Complete");
        }
    }
}
