//! Bitstream decoding
//!
//! Weather sensors in the 433 MHz band encode bits as the combined
//! duration of one low pulse plus the following high pulse. The
//! [`BitstreamDecoder`] sums consecutive pulse pairs, classifies each
//! sum against two calibrated duration bands and accumulates the bits
//! MSB-first into an integer.
//!
//! Decoding is all-or-nothing: a single unclassifiable pair or a
//! repeated pulse level discards the whole frame. Partial values are
//! never returned.

use std::sync::Arc;

use crate::diag::{DiagEvent, DiagnosticSink};
use crate::pulse::PulseFrame;

/// A decoded frame: raw bits as an integer plus the bit count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitstreamRecord {
    /// Capture timestamp of the source frame (Unix seconds)
    pub timestamp: u64,
    /// Decoded bits, MSB first
    pub value: u64,
    /// Number of decoded bits
    pub bit_count: u32,
}

/// Calibrated duration bands for bit classification
///
/// A combined low+high pair duration strictly inside the Bit0 band
/// decodes as 0, strictly inside the Bit1 band as 1. Anything else is a
/// structural failure for the whole frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitCalibration {
    bit0_min: f64,
    bit0_max: f64,
    bit1_min: f64,
    bit1_max: f64,
}

impl BitCalibration {
    /// Coarse legacy calibration: Bit0 2000-3500, Bit1 4000-5500
    ///
    /// Wide enough for any sensor seen so far, at the cost of letting
    /// more noise through to the protocol decoders.
    pub fn legacy() -> Self {
        Self {
            bit0_min: 2000.0,
            bit0_max: 3500.0,
            bit1_min: 4000.0,
            bit1_max: 5500.0,
        }
    }

    /// Build a calibration from measured band edges, widened by the
    /// given tolerance fraction on each side
    pub fn with_tolerance(
        bit0_min: f64,
        bit0_max: f64,
        bit1_min: f64,
        bit1_max: f64,
        tolerance: f64,
    ) -> Self {
        Self {
            bit0_min: bit0_min * (1.0 - tolerance),
            bit0_max: bit0_max * (1.0 + tolerance),
            bit1_min: bit1_min * (1.0 - tolerance),
            bit1_max: bit1_max * (1.0 + tolerance),
        }
    }

    /// Check if a pair duration falls inside the Bit0 band (exclusive)
    pub fn is_bit0(&self, width_us: u64) -> bool {
        let w = width_us as f64;
        w > self.bit0_min && w < self.bit0_max
    }

    /// Check if a pair duration falls inside the Bit1 band (exclusive)
    pub fn is_bit1(&self, width_us: u64) -> bool {
        let w = width_us as f64;
        w > self.bit1_min && w < self.bit1_max
    }
}

impl Default for BitCalibration {
    /// Measured Digoo R8S / Globaltronics GT-WT-02 bands, +/-10%
    fn default() -> Self {
        Self::with_tolerance(2410.0, 2960.0, 4450.0, 5120.0, 0.10)
    }
}

/// Decodes pulse frames into bitstream records
pub struct BitstreamDecoder {
    calibration: BitCalibration,
    sink: Arc<dyn DiagnosticSink>,
}

impl BitstreamDecoder {
    /// Create a decoder with the given calibration
    pub fn new(calibration: BitCalibration, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { calibration, sink }
    }

    /// Get the active calibration
    pub fn calibration(&self) -> BitCalibration {
        self.calibration
    }

    /// Decode a frame, or `None` on structural failure
    ///
    /// Structural failures (repeated level, unclassifiable pair
    /// duration) are reported to the diagnostic sink and discard the
    /// frame. A trailing unpaired pulse width is silently ignored.
    pub fn decode(&self, frame: &PulseFrame) -> Option<BitstreamRecord> {
        // Levels must alternate within a frame
        for (i, pair) in frame.pulses.windows(2).enumerate() {
            if pair[0].level == pair[1].level {
                self.sink.report(DiagEvent::RepeatedLevel { position: i + 1 });
                return None;
            }
        }

        let widths: Vec<u64> = frame.pulses.iter().map(|p| p.width_us as u64).collect();
        let pairs = widths.chunks_exact(2);
        let bit_count = pairs.len();

        // The accumulator holds 64 bits; real transmissions are 37
        if bit_count > u64::BITS as usize {
            self.sink.report(DiagEvent::OversizedFrame { bits: bit_count });
            return None;
        }

        let mut value: u64 = 0;
        for pair in pairs {
            let duration = pair[0] + pair[1];
            value <<= 1;
            if self.calibration.is_bit0(duration) {
                // 0 bit, nothing to set
            } else if self.calibration.is_bit1(duration) {
                value |= 1;
            } else {
                self.sink
                    .report(DiagEvent::UnclassifiedBitWidth { width_us: duration });
                return None;
            }
        }

        Some(BitstreamRecord {
            timestamp: frame.timestamp,
            value,
            bit_count: bit_count as u32,
        })
    }
}
