//! Sensor discovery
//!
//! Discovery answers "which sensors are transmitting right now?" while
//! pressing the test button on a new sensor. Every protocol decoder
//! runs in identify mode, which adds plausibility checks on top of the
//! normal layout decode so that random noise rarely masquerades as a
//! new device. Used to populate the registry, never in the steady-state
//! telemetry path.

use crate::bitstream::BitstreamRecord;
use crate::protocol::{Protocol, SensorReading};

/// Runs all protocol decoders in discovery mode
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorIdentifier;

impl SensorIdentifier {
    /// Create a new identifier
    pub fn new() -> Self {
        Self
    }

    /// Return every candidate reading for a record
    ///
    /// The set may be empty, or hold more than one entry when several
    /// layouts happen to fit the same bit pattern.
    pub fn identify(&self, record: &BitstreamRecord) -> Vec<SensorReading> {
        Protocol::ALL
            .iter()
            .filter_map(|protocol| protocol.decode(record, true))
            .collect()
    }
}
