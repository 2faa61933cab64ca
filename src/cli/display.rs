//! Display utilities for the notify timer CLI.
//!
//! This module provides formatted output for:
//! - The timer header and the expiry line
//! - Usage and error messages
//! - Dispatch reports

use std::io::{self, Write};

use crate::duration;
use crate::types::{DispatchOutcome, Seconds};

/// Hint printed after an unparseable time argument.
pub const TIME_FORMAT_HINT: &str = "Use format like: 1h30m, 90m, 3600s, etc.";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Writes the lines printed before the countdown starts.
    pub fn write_start<W: Write + ?Sized>(
        out: &mut W,
        total: Seconds,
        message: &str,
    ) -> io::Result<()> {
        writeln!(out, "Starting timer for: {}", duration::format(total))?;
        writeln!(out, "Message: {}", message)
    }

    /// Writes one countdown frame, overwriting the previous one.
    pub fn write_frame<W: Write + ?Sized>(out: &mut W, remaining: Seconds) -> io::Result<()> {
        write!(out, "\r{:<20}", duration::format(remaining))?;
        out.flush()
    }

    /// Writes the expiry line.
    pub fn write_time_up<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
        write!(out, "\nTime's up!\n")?;
        out.flush()
    }

    /// Writes the usage text shown when too few arguments are given.
    pub fn write_usage<W: Write + ?Sized>(out: &mut W, program: &str) -> io::Result<()> {
        writeln!(
            out,
            "{} v{} -- command-line countdown timer.",
            program,
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(out, "Usage:")?;
        writeln!(out, "    {} <time> <message>", program)?;
        writeln!(out, "    {} [audio] <time> <message>", program)?;
        writeln!(out, "Time format examples: 1h30m, 90m, 3600s, 2h15m10s")?;
        writeln!(out, "Example: {} 5m \"Take a break!\"", program)
    }

    /// Shows the usage text on stdout.
    pub fn show_usage(program: &str) {
        // Nothing useful can be done if stdout is closed.
        let _ = Self::write_usage(&mut io::stdout(), program);
    }

    /// Shows dispatch outcomes as pretty-printed JSON.
    pub fn show_outcomes_json(outcomes: &[DispatchOutcome]) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
        Ok(())
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
