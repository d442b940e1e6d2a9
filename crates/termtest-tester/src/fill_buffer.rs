//! Oversized single-write line.
//!
//! Each segment is `:NNN:` followed by the digits `5..80` taken mod 10, so a
//! segment is always [`SEGMENT_LEN`] bytes and the full line (newline
//! included) is [`LINE_LEN`] bytes.

use std::fmt::Write as _;
use std::io::{self, Write};

pub const SEGMENTS: usize = 300;
pub const DIGITS_PER_SEGMENT: usize = 75;
/// `:` + three digits + `:`.
pub const PREFIX_LEN: usize = 5;
pub const SEGMENT_LEN: usize = PREFIX_LEN + DIGITS_PER_SEGMENT;
pub const LINE_LEN: usize = SEGMENTS * SEGMENT_LEN + 1;

const FIRST_DIGIT: usize = 5;

/// Build the full line, trailing `\n` included.
#[must_use]
pub fn fill_buffer_line() -> String {
    let mut line = String::with_capacity(LINE_LEN);
    for index in 0..SEGMENTS {
        // Writing into a String cannot fail.
        let _ = write!(line, ":{index:03}:");
        for j in FIRST_DIGIT..FIRST_DIGIT + DIGITS_PER_SEGMENT {
            line.push(char::from(b'0' + (j % 10) as u8));
        }
    }
    line.push('\n');
    line
}

/// Emit the line with a single write, then flush.
pub fn write_fill_buffer<W: Write>(out: &mut W) -> io::Result<()> {
    let line = fill_buffer_line();
    tracing::debug!(bytes = line.len(), "writing fill buffer");
    out.write_all(line.as_bytes())?;
    out.flush()
}
