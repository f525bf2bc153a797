//! Bit-map descriptors.
//!
//! Descriptors arrive pre-parsed from an external loader (the CSV reader is a
//! collaborator, not part of the core) and are immutable after validation.

use crate::key::{DeviceKind, SignalKey};
use crate::{SignalMapError, SignalMapResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One bit-field in a device report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalDescriptor {
    /// Device-prefixed identity.
    pub key: SignalKey,
    /// Human-readable name shown in UIs (`JOY_X`).
    pub display_name: String,
    /// First bit of the field, counted LSB-first from byte 0.
    pub bit_start: u16,
    /// Field width in bits, `1..=32`.
    pub bit_count: u8,
    /// Whether the field carries an analog quantity.
    pub analog: bool,
}

impl SignalDescriptor {
    /// Build a descriptor.
    #[must_use]
    pub fn new(
        device: DeviceKind,
        id: &str,
        display_name: &str,
        bit_start: u16,
        bit_count: u8,
        analog: bool,
    ) -> Self {
        Self {
            key: SignalKey::new(device, id),
            display_name: display_name.to_string(),
            bit_start,
            bit_count,
            analog,
        }
    }

    /// Validate the field width.
    ///
    /// # Errors
    ///
    /// [`SignalMapError::BitCountOutOfRange`] unless `1 <= bit_count <= 32`.
    pub fn validate(&self) -> SignalMapResult<()> {
        if self.bit_count == 0 || self.bit_count > 32 {
            return Err(SignalMapError::BitCountOutOfRange {
                key: self.key.to_string(),
                bit_count: self.bit_count,
            });
        }
        Ok(())
    }

    /// Number of report bytes the field needs.
    #[must_use]
    pub fn required_report_len(&self) -> usize {
        let last_bit = u32::from(self.bit_start) + u32::from(self.bit_count) - 1;
        (last_bit / 8 + 1) as usize
    }

    /// Largest raw value the field can hold.
    #[must_use]
    pub fn max_raw(&self) -> u64 {
        if self.bit_count >= 64 {
            u64::MAX
        } else {
            (1u64 << self.bit_count) - 1
        }
    }
}

/// A validated, immutable set of descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalMap {
    descriptors: Vec<SignalDescriptor>,
}

impl SignalMap {
    /// Build and validate a map.
    ///
    /// # Errors
    ///
    /// Propagates descriptor validation failures and rejects duplicate keys.
    pub fn new(descriptors: Vec<SignalDescriptor>) -> SignalMapResult<Self> {
        let mut seen = HashSet::new();
        for d in &descriptors {
            d.validate()?;
            if !seen.insert(d.key.clone()) {
                return Err(SignalMapError::DuplicateKey(d.key.to_string()));
            }
        }
        Ok(Self { descriptors })
    }

    /// All descriptors, in map order.
    #[must_use]
    pub fn descriptors(&self) -> &[SignalDescriptor] {
        &self.descriptors
    }

    /// Descriptors belonging to one device.
    pub fn for_device(&self, device: DeviceKind) -> impl Iterator<Item = &SignalDescriptor> {
        self.descriptors
            .iter()
            .filter(move |d| d.key.device == device)
    }

    /// Look up a descriptor by key.
    #[must_use]
    pub fn get(&self, key: &SignalKey) -> Option<&SignalDescriptor> {
        self.descriptors.iter().find(|d| &d.key == key)
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Devices for which a signal id is unique, for legacy-key migration.
    ///
    /// Returns `Some(device)` when exactly one device carries `id`, `None`
    /// when the id is absent or ambiguous.
    #[must_use]
    pub fn unique_device_for_id(&self, id: &str) -> Option<DeviceKind> {
        let mut found = None;
        for d in &self.descriptors {
            if d.key.id == id {
                match found {
                    None => found = Some(d.key.device),
                    Some(dev) if dev == d.key.device => {}
                    Some(_) => return None,
                }
            }
        }
        found
    }

    /// The built-in X56-style default map used when no external bit-map is
    /// supplied.
    #[must_use]
    pub fn builtin_default() -> Self {
        use DeviceKind::{Stick, Throttle};
        let d = |dev, id, name, start, count, analog| {
            SignalDescriptor::new(dev, id, name, start, count, analog)
        };
        let descriptors = vec![
            // Stick
            d(Stick, "joy_x", "JOY_X", 8, 16, true),
            d(Stick, "joy_y", "JOY_Y", 24, 16, true),
            d(Stick, "joy_z", "JOY_Z", 40, 12, true),
            d(Stick, "pov", "POV", 52, 4, false),
            d(Stick, "trigger", "TRIGGER", 56, 1, false),
            d(Stick, "a", "BTN_A", 57, 1, false),
            d(Stick, "b", "BTN_B", 58, 1, false),
            d(Stick, "c", "C_BTN", 59, 1, false),
            d(Stick, "d", "BTN_D", 60, 1, false),
            d(Stick, "e", "BTN_E", 61, 1, false),
            d(Stick, "h1", "H1", 62, 4, false),
            d(Stick, "h2", "H2", 66, 4, false),
            d(Stick, "c_joy_x", "C_JOY_X", 80, 8, true),
            d(Stick, "c_joy_y", "C_JOY_Y", 88, 8, true),
            // Throttle
            d(Throttle, "left_throttle", "LEFT_THROTTLE", 8, 10, true),
            d(Throttle, "right_throttle", "RIGHT_THROTTLE", 18, 10, true),
            d(Throttle, "thumb_joy_x", "THUMB_JOY_X", 32, 8, true),
            d(Throttle, "thumb_joy_y", "THUMB_JOY_Y", 40, 8, true),
            d(Throttle, "thumb_joy_press", "THUMB_JOY_PRESS", 48, 1, false),
            d(Throttle, "e", "BTN_E", 49, 1, false),
            d(Throttle, "f", "BTN_F", 50, 1, false),
            d(Throttle, "g", "BTN_G", 51, 1, false),
            d(Throttle, "h", "BTN_H", 52, 1, false),
            d(Throttle, "i", "BTN_I", 53, 1, false),
            d(Throttle, "h3", "H3", 56, 4, false),
            d(Throttle, "h4", "H4", 60, 4, false),
            d(Throttle, "f_wheel", "F_WHEEL", 64, 8, true),
            d(Throttle, "g_wheel", "G_WHEEL", 72, 8, true),
        ];
        Self::new(descriptors).expect("builtin map is valid")
    }
}
