//! Pulse and frame types
//!
//! The receiver reports one line per electrical level transition. A
//! [`RawPulse`] is one contiguous high or low segment; a [`PulseFrame`]
//! is the sequence of pulses making up one transmission burst, bounded
//! by sync markers in the capture stream.

use std::fmt;

/// Electrical level of a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Level {
    /// Low level ("0" in the capture stream)
    Low = 0,
    /// High level ("1" in the capture stream)
    High = 1,
}

impl Level {
    /// Parse a level token from a data line
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "0" => Some(Level::Low),
            "1" => Some(Level::High),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "0"),
            Level::High => write!(f, "1"),
        }
    }
}

/// One contiguous high or low segment of the received signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPulse {
    /// Pulse level
    pub level: Level,
    /// Pulse width in microseconds
    pub width_us: u32,
}

impl RawPulse {
    /// Create a new pulse
    pub fn new(level: Level, width_us: u32) -> Self {
        Self { level, width_us }
    }

    /// Parse a device data line of the form `<level> <width_us>`
    ///
    /// Returns `None` for anything else: wrong token count, unknown
    /// level, non-numeric or negative width.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let level = Level::from_token(tokens.next()?)?;
        let width_us = tokens.next()?.parse().ok()?;
        if tokens.next().is_some() {
            return None;
        }
        Some(Self { level, width_us })
    }
}

/// One complete transmission burst
///
/// The two sync-pulse remnants that follow the SYNC marker have already
/// been dropped by the segmenter; `pulses` holds only payload pulses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseFrame {
    /// Capture timestamp of the first retained pulse (Unix seconds)
    pub timestamp: u64,
    /// Payload pulses, in capture order
    pub pulses: Vec<RawPulse>,
}

impl PulseFrame {
    /// Create a new frame
    pub fn new(timestamp: u64, pulses: Vec<RawPulse>) -> Self {
        Self { timestamp, pulses }
    }

    /// Number of pulses in the frame
    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    /// Check if the frame holds no pulses
    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_line() {
        let pulse = RawPulse::parse("1 4080").unwrap();
        assert_eq!(pulse.level, Level::High);
        assert_eq!(pulse.width_us, 4080);

        let pulse = RawPulse::parse("0 590").unwrap();
        assert_eq!(pulse.level, Level::Low);
        assert_eq!(pulse.width_us, 590);
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let pulse = RawPulse::parse("  0   590 ").unwrap();
        assert_eq!(pulse.width_us, 590);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(RawPulse::parse("").is_none());
        assert!(RawPulse::parse("0").is_none());
        assert!(RawPulse::parse("0 590 123").is_none());
        assert!(RawPulse::parse("2 590").is_none());
        assert!(RawPulse::parse("0 -590").is_none());
        assert!(RawPulse::parse("0 abc").is_none());
        assert!(RawPulse::parse("high 590").is_none());
    }

    #[test]
    fn test_level_roundtrip() {
        assert_eq!(Level::from_token("0"), Some(Level::Low));
        assert_eq!(Level::from_token("1"), Some(Level::High));
        assert_eq!(Level::from_token("01"), None);
        assert_eq!(format!("{}", Level::High), "1");
    }
}
