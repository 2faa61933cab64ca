//! Duration parsing and formatting.
//!
//! Durations are written the way people type them on a command line:
//!
//! ```text
//! 90        → 90 seconds
//! 90m       → 5400 seconds
//! 1h30m     → 5400 seconds
//! 2h 15m 10s → 8110 seconds
//! ```
//!
//! Parsing is lenient and never fails: unreadable input accumulates to zero
//! and the caller decides whether that is acceptable. Formatting always
//! produces the same four-field layout so a countdown redrawn in place keeps
//! a stable width.
//!
//! # Example
//!
//! ```rust
//! use notify_timer::duration::{format, parse};
//!
//! let seconds = parse("1h30m");
//! assert_eq!(seconds, 5400);
//! assert_eq!(format(seconds), " 0d  1h 30m  0s");
//! ```

mod format;
mod parser;

pub use format::{format, DurationComponents};
pub use parser::{parse, MAX_INPUT_LEN};
