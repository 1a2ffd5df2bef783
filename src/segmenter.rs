//! Frame segmentation
//!
//! The receiver's device stream is line oriented: control lines carry
//! the tokens `SYNC`, `END` or `ERR` somewhere in their text, data
//! lines carry `<level> <width_us>`. The [`FrameSegmenter`] turns that
//! stream into discrete [`PulseFrame`]s.
//!
//! Segmentation is a two-state machine. Until the first SYNC marker is
//! seen, all lines are ignored. After that, data lines accumulate in a
//! buffer; the next SYNC marker closes the frame. The first two buffered
//! pulses are sync-pulse remnants and are dropped before the frame is
//! handed out. `END` and `ERR` discard the buffer without emitting.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::diag::{DiagEvent, DiagnosticSink};
use crate::pulse::{PulseFrame, RawPulse};

/// Number of leading sync-pulse remnants dropped from each frame
const SYNC_REMNANTS: usize = 2;

/// Current Unix time in seconds
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A pulse stamped with its capture time
#[derive(Debug, Clone, Copy)]
struct StampedPulse {
    at: u64,
    pulse: RawPulse,
}

/// Segments a line stream into pulse frames
///
/// A fresh instance carries no residual state; each instance owns its
/// line source exclusively. The segmenter is lazy: it pulls lines only
/// when the consumer asks for the next frame, and it ends cleanly when
/// the line source ends, dropping any partially accumulated frame.
pub struct FrameSegmenter<I, C = fn() -> u64>
where
    I: Iterator<Item = String>,
    C: FnMut() -> u64,
{
    lines: I,
    clock: C,
    sink: Arc<dyn DiagnosticSink>,
    recording: bool,
    buffer: Vec<StampedPulse>,
}

impl<I> FrameSegmenter<I>
where
    I: Iterator<Item = String>,
{
    /// Create a segmenter stamping pulses with the system clock
    pub fn new(lines: I, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_clock(lines, sink, unix_now)
    }
}

impl<I, C> FrameSegmenter<I, C>
where
    I: Iterator<Item = String>,
    C: FnMut() -> u64,
{
    /// Create a segmenter with an injected clock (for deterministic tests)
    pub fn with_clock(lines: I, sink: Arc<dyn DiagnosticSink>, clock: C) -> Self {
        Self {
            lines,
            clock,
            sink,
            recording: false,
            buffer: Vec::new(),
        }
    }

    /// Close the current buffer, returning the completed frame if the
    /// buffer holds more than the sync-pulse remnants
    fn take_frame(&mut self) -> Option<PulseFrame> {
        if self.buffer.len() > SYNC_REMNANTS {
            let retained = self.buffer.split_off(SYNC_REMNANTS);
            self.buffer.clear();
            let timestamp = retained[0].at;
            let pulses = retained.into_iter().map(|s| s.pulse).collect();
            Some(PulseFrame::new(timestamp, pulses))
        } else {
            self.buffer.clear();
            None
        }
    }
}

impl<I, C> Iterator for FrameSegmenter<I, C>
where
    I: Iterator<Item = String>,
    C: FnMut() -> u64,
{
    type Item = PulseFrame;

    fn next(&mut self) -> Option<PulseFrame> {
        loop {
            let line = self.lines.next()?;
            let line = line.trim();

            // SYNC wins over END/ERR if a line somehow carries both
            if line.contains("SYNC") {
                let frame = self.take_frame();
                self.recording = true;
                if frame.is_some() {
                    return frame;
                }
                continue;
            }

            if line.contains("END") || line.contains("ERR") {
                self.buffer.clear();
                continue;
            }

            if !self.recording {
                continue;
            }

            match RawPulse::parse(line) {
                Some(pulse) => {
                    let at = (self.clock)();
                    self.buffer.push(StampedPulse { at, pulse });
                }
                None => self.sink.report(DiagEvent::MalformedLine {
                    line: line.to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{MemorySink, NullSink};
    use crate::pulse::Level;

    fn segment(lines: &[&str]) -> Vec<PulseFrame> {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        let mut t = 0;
        FrameSegmenter::with_clock(lines.into_iter(), Arc::new(NullSink), move || {
            t += 1;
            t
        })
        .collect()
    }

    #[test]
    fn test_drops_sync_remnants() {
        let frames = segment(&["SYNC", "1 8990", "0 590", "0 600", "1 2020", "SYNC"]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pulses.len(), 2);
        assert_eq!(frames[0].pulses[0], RawPulse::new(Level::Low, 600));
        assert_eq!(frames[0].pulses[1], RawPulse::new(Level::High, 2020));
    }

    #[test]
    fn test_frame_timestamp_is_first_retained_pulse() {
        // Clock ticks once per data line; the two remnants consume ticks
        // 1 and 2, so the first retained pulse is stamped 3.
        let frames = segment(&["SYNC", "1 8990", "0 590", "0 600", "1 2020", "SYNC"]);
        assert_eq!(frames[0].timestamp, 3);
    }

    #[test]
    fn test_lines_before_first_sync_ignored() {
        let frames = segment(&["0 600", "1 2020", "0 600", "1 2020", "SYNC"]);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_short_buffer_not_emitted() {
        // Two buffered pulses are all remnants, nothing to emit
        let frames = segment(&["SYNC", "1 8990", "0 590", "SYNC"]);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_end_discards_buffer() {
        let frames = segment(&[
            "SYNC", "1 8990", "0 590", "0 600", "1 2020", "END", "SYNC",
        ]);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_err_discards_buffer_but_keeps_recording() {
        let frames = segment(&[
            "SYNC", "0 1", "1 2", "0 3", "ERR",
            // Still accumulating: no new SYNC needed before data
            "1 8990", "0 590", "0 600", "1 2020", "SYNC",
        ]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pulses.len(), 2);
    }

    #[test]
    fn test_malformed_lines_skipped_and_reported() {
        let sink = Arc::new(MemorySink::new());
        let lines: Vec<String> = ["SYNC", "1 8990", "0 590", "garbage", "0 600", "1 2020", "SYNC"]
            .iter()
            .map(|l| l.to_string())
            .collect();
        let frames: Vec<_> =
            FrameSegmenter::with_clock(lines.into_iter(), sink.clone(), || 0).collect();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pulses.len(), 2);
        assert_eq!(
            sink.events(),
            vec![DiagEvent::MalformedLine {
                line: "garbage".to_string()
            }]
        );
    }

    #[test]
    fn test_multiple_frames() {
        let frames = segment(&[
            "SYNC", "1 1", "0 2", "0 600", "1 2020", "0 600", "1 4080",
            "SYNC", "1 1", "0 2", "0 610", "1 2030",
            "SYNC",
        ]);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].pulses.len(), 4);
        assert_eq!(frames[1].pulses.len(), 2);
    }

    #[test]
    fn test_partial_frame_dropped_at_end_of_stream() {
        let frames = segment(&["SYNC", "1 1", "0 2", "0 600", "1 2020"]);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_control_token_anywhere_in_line() {
        let frames = segment(&[
            "* SYNC pulse detected", "1 1", "0 2", "0 600", "1 2020",
            "rx SYNC marker",
        ]);
        assert_eq!(frames.len(), 1);
    }
}
