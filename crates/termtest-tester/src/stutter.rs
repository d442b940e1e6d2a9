//! Paced output: short lines separated by fixed pauses.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

pub const STUTTER_LINES: u32 = 20;
pub const STUTTER_DELAY: Duration = Duration::from_millis(50);

/// Write `stuttered N times` for `N` in `1..=count`, flushing each line and
/// sleeping `delay` after it.
pub fn write_stutter<W: Write>(out: &mut W, count: u32, delay: Duration) -> io::Result<()> {
    for n in 1..=count {
        writeln!(out, "stuttered {n} times")?;
        out.flush()?;
        tracing::trace!(line = n, "stutter line flushed");
        thread::sleep(delay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    /// Records when each flushed line became visible.
    #[derive(Default)]
    struct TimedWriter {
        pending: Vec<u8>,
        lines: Vec<(String, Instant)>,
    }

    impl Write for TimedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if !self.pending.is_empty() {
                let text = String::from_utf8(std::mem::take(&mut self.pending))
                    .map_err(io::Error::other)?;
                self.lines.push((text, Instant::now()));
            }
            Ok(())
        }
    }

    #[test]
    fn emits_every_line_in_order() {
        let mut out = Vec::new();
        write_stutter(&mut out, STUTTER_LINES, Duration::ZERO).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected: Vec<String> = (1..=20).map(|n| format!("stuttered {n} times")).collect();
        assert_eq!(text.lines().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn each_line_is_flushed_separately_and_paced() {
        let delay = Duration::from_millis(15);
        let mut out = TimedWriter::default();
        write_stutter(&mut out, 5, delay).unwrap();

        assert_eq!(out.lines.len(), 5);
        for (i, (text, _)) in out.lines.iter().enumerate() {
            assert_eq!(text, &format!("stuttered {} times\n", i + 1));
        }
        for pair in out.lines.windows(2) {
            let gap = pair[1].1.duration_since(pair[0].1);
            assert!(gap >= delay, "lines flushed {gap:?} apart, expected >= {delay:?}");
        }
    }

    #[test]
    fn zero_count_writes_nothing() {
        let mut out = Vec::new();
        write_stutter(&mut out, 0, STUTTER_DELAY).unwrap();
        assert!(out.is_empty());
    }
}
