//! Lenient parser for compound duration strings.

use crate::types::Seconds;

/// Number of input bytes considered by [`parse`]; anything beyond is ignored.
pub const MAX_INPUT_LEN: usize = 64;

const SECONDS_PER_HOUR: Seconds = 3600;
const SECONDS_PER_MINUTE: Seconds = 60;

/// Parses a duration string into total seconds.
///
/// The input is scanned left to right as a sequence of `<number>[unit]`
/// components. Units are `h`, `m` and `s` in either case; a number without a
/// unit counts as seconds. Anything that is not a digit between components
/// is skipped, so `"1h, 30m"` and `"1h30m"` are equivalent.
///
/// Parsing never fails. It stops at the first position where no number can
/// be read and returns what has been accumulated so far, which may be zero.
/// Units are neither ordered nor deduplicated: `"5h5h"` is ten hours.
///
/// Only the first [`MAX_INPUT_LEN`] bytes are read. Totals saturate at
/// `u64::MAX` instead of overflowing.
///
/// # Example
///
/// ```rust
/// use notify_timer::duration::parse;
///
/// assert_eq!(parse("90m"), 5400);
/// assert_eq!(parse("30s1h"), 3630);
/// assert_eq!(parse("abc"), 0);
/// ```
#[must_use]
pub fn parse(text: &str) -> Seconds {
    let bytes = &text.as_bytes()[..text.len().min(MAX_INPUT_LEN)];
    let mut total: Seconds = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let Some((value, after_number)) = read_number(bytes, pos) else {
            break;
        };
        pos = after_number;

        let multiplier = match bytes.get(pos) {
            Some(b'h' | b'H') => Some(SECONDS_PER_HOUR),
            Some(b'm' | b'M') => Some(SECONDS_PER_MINUTE),
            Some(b's' | b'S') => Some(1),
            _ => None,
        };
        if multiplier.is_some() {
            pos += 1;
        }
        total = total.saturating_add(value.saturating_mul(multiplier.unwrap_or(1)));

        while pos < bytes.len() && !bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }

    total
}

/// Reads an unsigned number starting at `pos`.
///
/// Leading whitespace and a single sign character are accepted and the sign
/// is discarded. Returns the value and the position after its last digit, or
/// `None` if no digit follows.
fn read_number(bytes: &[u8], mut pos: usize) -> Option<(Seconds, usize)> {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    if matches!(bytes.get(pos), Some(b'+' | b'-')) {
        pos += 1;
    }

    let start = pos;
    let mut value: Seconds = 0;
    while let Some(digit) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
        value = value
            .saturating_mul(10)
            .saturating_add(Seconds::from(digit - b'0'));
        pos += 1;
    }

    (pos > start).then_some((value, pos))
}
