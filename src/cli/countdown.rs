//! Countdown loop for the notify timer.
//!
//! Renders one frame per tick from the total down to zero, sleeping between
//! frames. The sleep function and the output are injected so the loop can
//! run instantly in tests.

use std::io::{self, Write};
use std::time::Duration;

use tracing::debug;

use super::display::Display;
use crate::types::Seconds;

/// A blocking countdown.
pub struct Countdown<S> {
    total: Seconds,
    tick: Duration,
    sleep: S,
}

impl<S: FnMut(Duration)> Countdown<S> {
    /// Creates a countdown of `total` ticks of length `tick`.
    pub fn new(total: Seconds, tick: Duration, sleep: S) -> Self {
        Self { total, tick, sleep }
    }

    /// Returns the number of ticks.
    pub fn total(&self) -> Seconds {
        self.total
    }

    /// Runs the countdown to zero.
    ///
    /// Writes `total + 1` frames (including the final zero frame), sleeps
    /// `total` times, then writes the expiry line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        debug!("Countdown started: {} ticks of {:?}", self.total, self.tick);

        let mut remaining = self.total;
        loop {
            Display::write_frame(out, remaining)?;
            if remaining == 0 {
                break;
            }
            (self.sleep)(self.tick);
            remaining -= 1;
        }

        Display::write_time_up(out)?;
        debug!("Countdown finished");
        Ok(())
    }
}

impl<S> std::fmt::Debug for Countdown<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Countdown")
            .field("total", &self.total)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_countdown(total: Seconds) -> (String, Vec<Duration>) {
        let mut sleeps = Vec::new();
        let mut out = Vec::new();
        Countdown::new(total, Duration::from_millis(250), |d| sleeps.push(d))
            .run(&mut out)
            .unwrap();
        (String::from_utf8(out).unwrap(), sleeps)
    }

    #[test]
    fn test_one_frame_per_second_plus_zero() {
        let (text, sleeps) = run_countdown(3);
        assert_eq!(text.matches('\r').count(), 4);
        assert_eq!(sleeps.len(), 3);
        assert!(sleeps.iter().all(|d| *d == Duration::from_millis(250)));
    }

    #[test]
    fn test_frames_count_down_in_order() {
        let (text, _) = run_countdown(2);
        let frames: Vec<&str> = text
            .split('\r')
            .skip(1)
            .map(|f| f.trim_end_matches("\nTime's up!\n").trim_end())
            .collect();
        assert_eq!(frames, vec![" 0d  0h  0m  2s", " 0d  0h  0m  1s", " 0d  0h  0m  0s"]);
    }

    #[test]
    fn test_ends_with_time_up() {
        let (text, _) = run_countdown(1);
        assert!(text.ends_with(" 0d  0h  0m  0s     \nTime's up!\n"));
    }

    #[test]
    fn test_zero_total_renders_single_frame() {
        let (text, sleeps) = run_countdown(0);
        assert_eq!(text, "\r 0d  0h  0m  0s     \nTime's up!\n");
        assert!(sleeps.is_empty());
    }

    #[test]
    fn test_minute_boundary_carries() {
        let (text, _) = run_countdown(61);
        assert!(text.starts_with("\r 0d  0h  1m  1s"));
        assert!(text.contains("\r 0d  0h  0m 59s"));
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut countdown = Countdown::new(5, Duration::ZERO, |_| {});
        assert_eq!(countdown.total(), 5);
        assert!(countdown.run(&mut Broken).is_err());
    }
}
