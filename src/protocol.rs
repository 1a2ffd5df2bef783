//! Sensor protocol decoders
//!
//! Each supported device family declares a fixed 37-bit layout over the
//! decoded bitstream value. [`Protocol`] is a closed enumeration: adding
//! a device means adding a variant, and the compiler then points at
//! every `match` that needs the new layout.
//!
//! Decoders decline records whose bit count does not match their
//! declared width. Declining is not an error, it just means "this
//! decoder does not apply" and the next one gets a try.
//!
//! # Layouts (MSB to LSB)
//!
//! Digoo R8S (37 bits):
//!
//! ```text
//! DDDD RRRRRRRR B M CC TTTTTTTTTTTT HHHHHHHH Z
//! 4    8        1 1 2  12           8        1
//! ```
//!
//! D: fixed device nibble (1001), R: random id (changes on reset),
//! B: battery (0=good), M: test mode, C: channel, T: temperature in
//! 0.1 C two's complement, H: humidity percent, Z: trailer.
//!
//! Globaltronics GT-WT-02 (37 bits):
//!
//! ```text
//! RRRRRRRR B M CC TTTTTTTTTTTT HHHHHHH XXXXX Z
//! 8        1 1 2  12           7       5     1
//! ```
//!
//! X: checksum (not verified, see crate docs).

use std::fmt;

use serde::Serialize;

use crate::bitstream::BitstreamRecord;

/// Total bit width shared by both reference layouts
pub const FRAME_BITS: u32 = 37;

/// Fixed leading device nibble of the Digoo R8S
const R8S_DEVICE_NIBBLE: u64 = 0b1001;

/// Channel value sensors transmit on while in test/pairing mode
const TEST_CHANNEL: u8 = 2;

/// Plausible ambient range for discovery, in tenths of a degree
/// (15.0 to 35.0 C, exclusive)
const PLAUSIBLE_TEMP_MIN: i16 = 150;
const PLAUSIBLE_TEMP_MAX: i16 = 350;

/// A decoded temperature/humidity observation from one transmission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorReading {
    /// Capture timestamp (Unix seconds)
    pub timestamp: u64,
    /// Protocol the reading was decoded under
    pub protocol: Protocol,
    /// Stable identity: `<protocol>:<device_id>:<channel>`
    pub canonical_key: String,
    /// Device id as transmitted (random, changes on battery swap)
    pub device_id: u16,
    /// Channel selector setting
    pub channel: u8,
    /// Battery status
    pub battery_ok: bool,
    /// Whether the transmission was triggered by the test button
    pub test_mode: bool,
    /// Temperature in tenths of a degree Celsius
    pub temperature_tenths_c: i16,
    /// Relative humidity in percent
    pub humidity_percent: u8,
}

impl SensorReading {
    /// Temperature in degrees Celsius
    pub fn temperature_c(&self) -> f64 {
        self.temperature_tenths_c as f64 / 10.0
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.1}C {}%",
            self.canonical_key,
            self.temperature_c(),
            self.humidity_percent
        )
    }
}

/// Supported device families, in dispatch priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Protocol {
    /// Digoo R8S
    DigooR8s,
    /// Globaltronics GT-WT-02
    GtWt02,
}

impl Protocol {
    /// All supported protocols, in the fixed dispatch priority order
    pub const ALL: [Protocol; 2] = [Protocol::DigooR8s, Protocol::GtWt02];

    /// Short protocol name used in canonical keys
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::DigooR8s => "r8s",
            Protocol::GtWt02 => "gt-wt-02",
        }
    }

    /// Decode a bitstream record under this protocol's layout
    ///
    /// Returns `None` if the record's bit count does not match the
    /// layout, or (with `identify`) if the reading fails the discovery
    /// sanity filter: test mode set, test channel selected and a
    /// plausible ambient temperature. The R8S additionally requires its
    /// fixed leading device nibble during discovery.
    pub fn decode(&self, record: &BitstreamRecord, identify: bool) -> Option<SensorReading> {
        if record.bit_count != FRAME_BITS {
            return None;
        }

        let v = record.value;
        let (device_id, battery_bit, test_bit, channel, temp_raw, humidity_percent) = match self {
            Protocol::DigooR8s => (
                ((v >> 25) & 0xfff) as u16,
                (v >> 24) & 0x1,
                (v >> 23) & 0x1,
                ((v >> 21) & 0x3) as u8,
                (v >> 9) & 0xfff,
                ((v >> 1) & 0xff) as u8,
            ),
            Protocol::GtWt02 => (
                ((v >> 29) & 0xff) as u16,
                (v >> 28) & 0x1,
                (v >> 27) & 0x1,
                ((v >> 25) & 0x3) as u8,
                (v >> 13) & 0xfff,
                ((v >> 1) & 0x7f) as u8,
            ),
        };

        let temperature_tenths_c = twos_complement(temp_raw, 12) as i16;
        let test_mode = test_bit == 1;

        if identify {
            if matches!(self, Protocol::DigooR8s) && (v >> 33) & 0xf != R8S_DEVICE_NIBBLE {
                return None;
            }
            if !plausible_pairing(test_mode, channel, temperature_tenths_c) {
                return None;
            }
        }

        Some(SensorReading {
            timestamp: record.timestamp,
            protocol: *self,
            canonical_key: format!("{}:{}:{}", self.name(), device_id, channel),
            device_id,
            channel,
            battery_ok: battery_bit == 0,
            test_mode,
            temperature_tenths_c,
            humidity_percent,
        })
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign-extend a `bits`-wide two's-complement field
fn twos_complement(value: u64, bits: u32) -> i32 {
    let value = value as i32;
    if value & (1 << (bits - 1)) != 0 {
        value - (1 << bits)
    } else {
        value
    }
}

/// Discovery sanity filter: sensors being paired transmit in test mode
/// on the test channel, at room temperature
fn plausible_pairing(test_mode: bool, channel: u8, temperature_tenths_c: i16) -> bool {
    test_mode
        && channel == TEST_CHANNEL
        && temperature_tenths_c > PLAUSIBLE_TEMP_MIN
        && temperature_tenths_c < PLAUSIBLE_TEMP_MAX
}

/// Assemble an R8S value from its fields (shared by unit tests)
#[cfg(test)]
pub(crate) fn r8s_value(
    device_id: u64,
    battery: u64,
    test: u64,
    channel: u64,
    temp_raw: u64,
    humidity: u64,
) -> u64 {
    (device_id << 25) | (battery << 24) | (test << 23) | (channel << 21) | (temp_raw << 9)
        | (humidity << 1)
}
