//! CLI module for the notify timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `countdown`: The blocking countdown loop
//! - `display`: Output formatting and display logic
//! - `timer`: Argument assembly and a complete timer run

pub mod commands;
pub mod countdown;
pub mod display;
pub mod timer;

pub use commands::{Cli, Commands, TimerArgs};
pub use countdown::Countdown;
pub use display::Display;
pub use timer::{join_message, run_timer, TimerError, TimerRequest, MESSAGE_CAP};
