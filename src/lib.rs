//! # rxb6 - 433 MHz weather sensor decoder
//!
//! Turns the raw pulse-timing stream of an RXB6 superheterodyne
//! receiver into temperature/humidity readings from consumer wireless
//! weather sensors, and averages them per physical sensor over a
//! sampling window.
//!
//! This is a best-effort, lossy decoder. RF reception on the 433 MHz
//! band is noisy: most captured frames are garbled and are silently
//! discarded. Only structurally clean frames become observations, and
//! no failure anywhere in the pipeline ever terminates it.
//!
//! ## Pipeline
//!
//! ```text
//! device lines -> FrameSegmenter -> PulseFrame
//!              -> BitstreamDecoder -> BitstreamRecord (value, bits)
//!              -> Protocol decoders -> SensorReading
//!              -> ReadingDispatcher -> NamedReading
//!              -> WindowAverager   -> AverageRecord
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use rxb6::Receiver;
//!
//! // Synthesize a clean capture: SYNC marker, two sync-pulse
//! // remnants, then one low/high pulse pair per bit.
//! let value: u64 = (1 << 25) + (100 << 9) + (50 << 1);
//! let mut lines = vec!["SYNC".to_string(), "1 8990".to_string(), "0 590".to_string()];
//! for i in (0..37).rev() {
//!     let high = if (value >> i) & 1 == 1 { 4080 } else { 2020 };
//!     lines.push("0 600".to_string());
//!     lines.push(format!("1 {}", high));
//! }
//! lines.push("SYNC".to_string());
//!
//! let receiver = Receiver::new();
//! let readings: Vec<_> = receiver.readings(lines.into_iter()).collect();
//!
//! assert_eq!(readings[0].reading.canonical_key, "r8s:1:0");
//! assert_eq!(readings[0].reading.temperature_c(), 10.0);
//! assert_eq!(readings[0].reading.humidity_percent, 50);
//! ```
//!
//! On a live system the lines come from the device file, bounded by a
//! sampling deadline:
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use std::time::Duration;
//! use rxb6::{device_lines, Deadline, DeadlineLines, Receiver, Registry};
//!
//! # fn main() -> rxb6::Result<()> {
//! let registry = Registry::from_file("/etc/rxb6/sensors.json")?;
//! let receiver = Receiver::new().with_registry(registry);
//!
//! let device = BufReader::new(File::open("/dev/rxb6").expect("device"));
//! let window = DeadlineLines::new(device_lines(device), Deadline::after(Duration::from_secs(90)));
//!
//! for average in receiver.read_average(window) {
//!     println!("{} {:.1}C {:.1}%", average.key, average.temperature_avg, average.humidity_avg);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`segmenter`]: line stream to pulse frames
//! - [`bitstream`]: pulse frames to (value, bit count) records
//! - [`protocol`]: per-device bit layouts
//! - [`identify`]: sensor discovery (pairing mode)
//! - [`dispatch`]: registry resolution and broadcast decode
//! - [`average`]: per-sensor window averaging
//! - [`deadline`]: cooperative sampling-window cancellation
//! - [`diag`]: injected diagnostic sinks
//!
//! ## Known limitations
//!
//! Both reference layouts are 37 bits wide, so in broadcast mode (no
//! registry) a record that decodes under one layout also decodes under
//! the other and yields two readings. The ambiguity is inherent to the
//! wire format; configure a registry to resolve it. The GT-WT-02
//! checksum field is not verified.

pub mod average;
pub mod bitstream;
pub mod deadline;
pub mod diag;
pub mod dispatch;
pub mod error;
pub mod identify;
pub mod protocol;
pub mod pulse;
pub mod receiver;
pub mod registry;
pub mod segmenter;

// Re-exports for convenient access
pub use average::{AverageRecord, WindowAverager};
pub use bitstream::{BitCalibration, BitstreamDecoder, BitstreamRecord};
pub use deadline::{Deadline, DeadlineLines};
pub use diag::{DiagEvent, DiagnosticSink, LogSink, MemorySink, NullSink};
pub use dispatch::{NamedReading, ReadingDispatcher};
pub use error::{Result, Rxb6Error};
pub use identify::SensorIdentifier;
pub use protocol::{Protocol, SensorReading, FRAME_BITS};
pub use pulse::{Level, PulseFrame, RawPulse};
pub use receiver::{device_lines, Receiver};
pub use registry::Registry;
pub use segmenter::FrameSegmenter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
