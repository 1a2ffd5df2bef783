//! Receiver pipeline facade
//!
//! [`Receiver`] wires the pipeline stages together over any line
//! source: segmentation, bitstream decode, protocol dispatch, discovery
//! and window averaging. Every accessor is lazy and pull-based; nothing
//! is read from the source until the returned iterator is advanced, and
//! at most one frame is in flight at a time.
//!
//! Each call owns its line source exclusively. The receiver itself
//! holds only immutable session state (calibration, registry,
//! diagnostic sink) and can drive any number of consecutive sessions.

use std::io::BufRead;
use std::sync::Arc;

use crate::average::{AverageRecord, WindowAverager};
use crate::bitstream::{BitCalibration, BitstreamDecoder, BitstreamRecord};
use crate::diag::{DiagnosticSink, LogSink};
use crate::dispatch::{NamedReading, ReadingDispatcher};
use crate::identify::SensorIdentifier;
use crate::protocol::SensorReading;
use crate::registry::Registry;
use crate::segmenter::FrameSegmenter;

/// Adapt a buffered reader into a line iterator
///
/// An I/O error ends the sequence cleanly, consistent with the lossy
/// best-effort contract of the rest of the pipeline.
pub fn device_lines<R: BufRead>(reader: R) -> impl Iterator<Item = String> {
    reader.lines().map_while(|line| line.ok())
}

/// End-to-end decode pipeline for one receiver device
#[derive(Clone)]
pub struct Receiver {
    calibration: BitCalibration,
    registry: Option<Arc<Registry>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Receiver {
    /// Create a receiver with default calibration, no registry and
    /// log-backed diagnostics
    pub fn new() -> Self {
        Self {
            calibration: BitCalibration::default(),
            registry: None,
            sink: Arc::new(LogSink),
        }
    }

    /// Resolve readings against a sensor registry
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Use a specific bit calibration
    pub fn with_calibration(mut self, calibration: BitCalibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Use a specific diagnostic sink
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Segment a line stream into pulse frames
    pub fn frames<I>(&self, lines: I) -> FrameSegmenter<I>
    where
        I: Iterator<Item = String>,
    {
        FrameSegmenter::new(lines, Arc::clone(&self.sink))
    }

    /// Decode a line stream into bitstream records
    ///
    /// Frames failing structural validation are dropped silently (the
    /// sink sees why).
    pub fn records<I>(&self, lines: I) -> impl Iterator<Item = BitstreamRecord>
    where
        I: Iterator<Item = String>,
    {
        let decoder = BitstreamDecoder::new(self.calibration, Arc::clone(&self.sink));
        self.frames(lines).filter_map(move |frame| decoder.decode(&frame))
    }

    /// Decode a line stream into sensor readings
    ///
    /// Broadcast mode without a registry; registry-resolved named
    /// readings otherwise.
    pub fn readings<I>(&self, lines: I) -> impl Iterator<Item = NamedReading>
    where
        I: Iterator<Item = String>,
    {
        let dispatcher = match &self.registry {
            Some(registry) => ReadingDispatcher::with_registry(Arc::clone(registry)),
            None => ReadingDispatcher::broadcast(),
        };
        self.records(lines)
            .flat_map(move |record| dispatcher.dispatch(&record))
    }

    /// Scan a line stream for sensors in test/pairing mode
    pub fn scan<I>(&self, lines: I) -> impl Iterator<Item = SensorReading>
    where
        I: Iterator<Item = String>,
    {
        let identifier = SensorIdentifier::new();
        self.records(lines)
            .flat_map(move |record| identifier.identify(&record))
    }

    /// Consume a (bounded) line stream and average the readings per
    /// sensor
    ///
    /// The stream must be finite: bound it with a
    /// [`DeadlineLines`](crate::deadline::DeadlineLines) wrapper for a
    /// sampling window on a live device.
    pub fn read_average<I>(&self, lines: I) -> Vec<AverageRecord>
    where
        I: Iterator<Item = String>,
    {
        let readings: Vec<NamedReading> = self.readings(lines).collect();
        WindowAverager::new().average(&readings)
    }
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}
