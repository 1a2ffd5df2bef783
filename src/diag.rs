//! Diagnostic events and sinks
//!
//! RF reception is inherently lossy: most frames are garbled and get
//! dropped. The pipeline reports the reason for each drop through an
//! injected [`DiagnosticSink`] instead of a process-wide logger, so
//! callers decide what (if anything) gets logged.

use std::sync::Mutex;

/// A non-fatal diagnostic event emitted while decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagEvent {
    /// A data line that could not be parsed as `<level> <width_us>`
    MalformedLine { line: String },
    /// Two consecutive pulses with the same level (structural failure)
    RepeatedLevel { position: usize },
    /// A combined pulse-pair duration outside both calibrated bit ranges
    UnclassifiedBitWidth { width_us: u64 },
    /// A frame with more bit pairs than the decoder can accumulate
    OversizedFrame { bits: usize },
}

impl DiagEvent {
    /// Whether this event indicates a discarded frame (as opposed to a
    /// single ignored line)
    pub fn is_frame_loss(&self) -> bool {
        !matches!(self, DiagEvent::MalformedLine { .. })
    }
}

/// Sink for diagnostic events
///
/// Implementations must tolerate being called from a hot path; events
/// fire once per dropped line or frame.
pub trait DiagnosticSink {
    /// Report a diagnostic event
    fn report(&self, event: DiagEvent);
}

/// Sink that forwards events through the `log` facade
///
/// Frame-structural failures are warning-class; ignored lines are
/// debug-class since they are routine on a noisy channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, event: DiagEvent) {
        match event {
            DiagEvent::MalformedLine { line } => log::debug!("Ignoring malformed line {:?}", line),
            DiagEvent::RepeatedLevel { position } => {
                log::warn!("Repeated pulse level at position {}", position)
            }
            DiagEvent::UnclassifiedBitWidth { width_us } => {
                log::warn!("Invalid bit width ({})", width_us)
            }
            DiagEvent::OversizedFrame { bits } => {
                log::warn!("Frame too long ({} bits)", bits)
            }
        }
    }
}

/// Sink that discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _event: DiagEvent) {}
}

/// Sink that records events in memory, for tests and diagnostics tooling
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagEvent>>,
}

impl MemorySink {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of all recorded events
    pub fn events(&self) -> Vec<DiagEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if no events were recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, event: DiagEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.report(DiagEvent::UnclassifiedBitWidth { width_us: 12345 });
        sink.report(DiagEvent::MalformedLine {
            line: "bogus".to_string(),
        });

        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.events()[0],
            DiagEvent::UnclassifiedBitWidth { width_us: 12345 }
        );
    }

    #[test]
    fn test_frame_loss_classification() {
        assert!(DiagEvent::RepeatedLevel { position: 1 }.is_frame_loss());
        assert!(DiagEvent::UnclassifiedBitWidth { width_us: 100 }.is_frame_loss());
        assert!(!DiagEvent::MalformedLine {
            line: String::new()
        }
        .is_frame_loss());
    }

    #[test]
    fn test_null_sink() {
        NullSink.report(DiagEvent::OversizedFrame { bits: 100 });
    }
}
