//! Notify Timer CLI - countdown timer with sound and desktop notification
//!
//! Waits for a human-friendly duration (`1h30m`, `90m`, `3600s`) while
//! showing a live countdown, then rings and notifies.

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use notify_timer::alert::default_backend;
use notify_timer::cli::{run_timer, Cli, Commands, Display, TimerArgs, TimerError, TimerRequest};
use notify_timer::dispatch::FallbackDispatcher;

/// Main entry point
fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli) {
        if matches!(e.downcast_ref::<TimerError>(), Some(err) if err.is_usage()) {
            Display::show_usage(env!("CARGO_BIN_NAME"));
        } else {
            Display::show_error(&e.to_string());
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

/// Executes the CLI command.
fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => run(&cli.timer),
    }
}

/// Runs a timer with the platform backend.
fn run(args: &TimerArgs) -> Result<()> {
    let request = TimerRequest::from_positionals(&args.positionals)?
        .with_audio_path(args.sound.clone());
    let config = args.alert_config();
    let dispatcher = FallbackDispatcher::new(default_backend());

    let outcomes = run_timer(
        &request,
        &config,
        &dispatcher,
        &mut io::stdout(),
        std::thread::sleep,
    )?;

    if args.json {
        Display::show_outcomes_json(&outcomes).context("failed to serialize dispatch report")?;
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
