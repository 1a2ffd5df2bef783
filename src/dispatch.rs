//! Reading dispatch
//!
//! The [`ReadingDispatcher`] runs the protocol decoders in normal mode
//! and resolves the results against the optional sensor registry.
//!
//! Without a registry every decoder that accepts the record contributes
//! a reading. When two layouts happen to fit the same bit pattern the
//! record yields two readings; this ambiguity is accepted as a known
//! limitation of broadcast mode rather than silently picking a winner.
//!
//! With a registry, decoders are tried in [`Protocol::ALL`] priority
//! order and the first whose canonical key is registered produces the
//! single named reading for the record. Unregistered records yield
//! nothing.

use std::sync::Arc;

use serde::Serialize;

use crate::bitstream::BitstreamRecord;
use crate::protocol::{Protocol, SensorReading};
use crate::registry::Registry;

/// A sensor reading with its registry resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedReading {
    /// The decoded reading
    pub reading: SensorReading,
    /// Display name from the registry; `None` in broadcast mode
    pub display_name: Option<String>,
}

impl NamedReading {
    /// Grouping label: the display name when resolved, the canonical
    /// key otherwise
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or(&self.reading.canonical_key)
    }
}

/// Dispatches bitstream records to the protocol decoders
#[derive(Debug, Clone, Default)]
pub struct ReadingDispatcher {
    registry: Option<Arc<Registry>>,
}

impl ReadingDispatcher {
    /// Create a broadcast-mode dispatcher (no registry)
    pub fn broadcast() -> Self {
        Self { registry: None }
    }

    /// Create a dispatcher resolving readings against a registry
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    /// Whether a registry is configured
    pub fn has_registry(&self) -> bool {
        self.registry.is_some()
    }

    /// Decode a record into zero or more readings
    ///
    /// Broadcast mode returns every accepting decoder's reading.
    /// Registry mode returns at most one reading, from the first
    /// decoder in priority order whose canonical key is registered.
    pub fn dispatch(&self, record: &BitstreamRecord) -> Vec<NamedReading> {
        match &self.registry {
            None => Protocol::ALL
                .iter()
                .filter_map(|protocol| protocol.decode(record, false))
                .map(|reading| NamedReading {
                    reading,
                    display_name: None,
                })
                .collect(),
            Some(registry) => {
                for protocol in Protocol::ALL {
                    if let Some(reading) = protocol.decode(record, false) {
                        if let Some(name) = registry.display_name(&reading.canonical_key) {
                            return vec![NamedReading {
                                display_name: Some(name.to_string()),
                                reading,
                            }];
                        }
                    }
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::r8s_value;

    fn record(value: u64) -> BitstreamRecord {
        BitstreamRecord {
            timestamp: 1_700_000_000,
            value,
            bit_count: 37,
        }
    }

    #[test]
    fn test_broadcast_returns_all_matches() {
        // Any 37-bit record is accepted by both layouts in normal mode
        let readings = ReadingDispatcher::broadcast()
            .dispatch(&record(r8s_value(0x905, 0, 0, 1, 225, 45)));
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].reading.protocol, Protocol::DigooR8s);
        assert_eq!(readings[1].reading.protocol, Protocol::GtWt02);
        assert!(readings.iter().all(|r| r.display_name.is_none()));
    }

    #[test]
    fn test_broadcast_label_falls_back_to_key() {
        let readings = ReadingDispatcher::broadcast()
            .dispatch(&record(r8s_value(0x905, 0, 0, 1, 225, 45)));
        assert_eq!(readings[0].label(), "r8s:2309:1");
    }

    #[test]
    fn test_registry_mode_returns_single_named_reading() {
        let mut registry = Registry::new();
        registry.insert("r8s:2309:1", "Living room");
        let dispatcher = ReadingDispatcher::with_registry(Arc::new(registry));

        let readings = dispatcher.dispatch(&record(r8s_value(0x905, 0, 0, 1, 225, 45)));
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].display_name.as_deref(), Some("Living room"));
        assert_eq!(readings[0].label(), "Living room");
        assert_eq!(readings[0].reading.protocol, Protocol::DigooR8s);
    }

    #[test]
    fn test_registry_mode_drops_unregistered_records() {
        let mut registry = Registry::new();
        registry.insert("r8s:1161:2", "Bedroom");
        let dispatcher = ReadingDispatcher::with_registry(Arc::new(registry));

        let readings = dispatcher.dispatch(&record(r8s_value(0x905, 0, 0, 1, 225, 45)));
        assert!(readings.is_empty());
    }

    #[test]
    fn test_registry_mode_tries_lower_priority_protocols() {
        // Only the GT-WT-02 interpretation of this record is registered
        let value = r8s_value(0x905, 0, 0, 1, 225, 45);
        let gt_key = Protocol::GtWt02
            .decode(&record(value), false)
            .unwrap()
            .canonical_key;

        let mut registry = Registry::new();
        registry.insert(gt_key.clone(), "Greenhouse");
        let dispatcher = ReadingDispatcher::with_registry(Arc::new(registry));

        let readings = dispatcher.dispatch(&record(value));
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].reading.canonical_key, gt_key);
        assert_eq!(readings[0].display_name.as_deref(), Some("Greenhouse"));
    }

    #[test]
    fn test_wrong_width_yields_nothing_in_both_modes() {
        let mut rec = record(r8s_value(0x905, 0, 0, 1, 225, 45));
        rec.bit_count = 36;

        assert!(ReadingDispatcher::broadcast().dispatch(&rec).is_empty());

        let mut registry = Registry::new();
        registry.insert("r8s:2309:1", "Living room");
        assert!(ReadingDispatcher::with_registry(Arc::new(registry))
            .dispatch(&rec)
            .is_empty());
    }
}
