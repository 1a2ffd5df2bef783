//! Time-windowed averaging
//!
//! Sensors retransmit every few seconds, so a sampling window collects
//! several readings per physical sensor. The [`WindowAverager`] groups
//! a finished batch by sensor identity and reduces each group to one
//! [`AverageRecord`].
//!
//! Groups are reported in ascending key order regardless of arrival
//! order, so output is deterministic across runs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dispatch::NamedReading;

/// Mean temperature/humidity for one sensor over a sampling window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageRecord {
    /// Timestamp of the first reading encountered for this sensor
    pub timestamp: u64,
    /// Display name or canonical key
    pub key: String,
    /// Mean temperature in degrees Celsius, rounded to one decimal
    pub temperature_avg: f64,
    /// Mean relative humidity in percent, rounded to one decimal
    pub humidity_avg: f64,
}

/// Groups readings by sensor identity and computes per-group means
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowAverager;

impl WindowAverager {
    /// Create a new averager
    pub fn new() -> Self {
        Self
    }

    /// Average a finite batch of readings
    ///
    /// One record per distinct sensor identity, in ascending key order.
    /// Each group's timestamp is that of the first member in the batch
    /// iteration order, which is not necessarily the minimum.
    pub fn average(&self, readings: &[NamedReading]) -> Vec<AverageRecord> {
        let mut groups: BTreeMap<&str, Vec<&NamedReading>> = BTreeMap::new();
        for reading in readings {
            groups.entry(reading.label()).or_default().push(reading);
        }

        groups
            .into_iter()
            .map(|(key, members)| {
                let count = members.len() as f64;
                let temperature_avg = members
                    .iter()
                    .map(|m| m.reading.temperature_c())
                    .sum::<f64>()
                    / count;
                let humidity_avg = members
                    .iter()
                    .map(|m| m.reading.humidity_percent as f64)
                    .sum::<f64>()
                    / count;
                AverageRecord {
                    timestamp: members[0].reading.timestamp,
                    key: key.to_string(),
                    temperature_avg: round_tenths(temperature_avg),
                    humidity_avg: round_tenths(humidity_avg),
                }
            })
            .collect()
    }
}

/// Round to one decimal place, half-up on the shifted value.
///
/// For negative means this rounds toward positive infinity: -21.35
/// becomes -21.3, not -21.4.
fn round_tenths(mean: f64) -> f64 {
    (mean * 10.0 + 0.5).floor() / 10.0
}
