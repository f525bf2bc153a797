//! Device-prefixed signal identity.

use crate::{SignalMapError, SignalMapResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which physical device a signal belongs to.
///
/// The prefix disambiguates identically named inputs across devices (both the
/// stick and the throttle expose an `E` button, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// The joystick.
    Stick,
    /// The throttle quadrant.
    Throttle,
    /// A standard gamepad.
    Gamepad,
}

impl DeviceKind {
    /// The lowercase prefix used in persisted keys (`stick`, `throttle`,
    /// `gamepad`).
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Stick => "stick",
            Self::Throttle => "throttle",
            Self::Gamepad => "gamepad",
        }
    }

    /// All device kinds, in enumeration order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Stick, Self::Throttle, Self::Gamepad]
    }
}

impl FromStr for DeviceKind {
    type Err = SignalMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stick" => Ok(Self::Stick),
            "throttle" => Ok(Self::Throttle),
            "gamepad" => Ok(Self::Gamepad),
            other => Err(SignalMapError::UnknownDevice(other.to_string())),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Fully qualified signal identity: device plus per-device id.
///
/// Serialized and displayed as `<device>:<id>`, e.g. `stick:joy_x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalKey {
    /// Owning device.
    pub device: DeviceKind,
    /// Per-device signal id, lowercase.
    pub id: String,
}

impl SignalKey {
    /// Build a key from parts.
    #[must_use]
    pub fn new(device: DeviceKind, id: impl Into<String>) -> Self {
        Self {
            device,
            id: id.into(),
        }
    }

    /// Parse a `<device>:<id>` string.
    ///
    /// # Errors
    ///
    /// [`SignalMapError::MalformedKey`] when the colon is missing or the id
    /// empty, [`SignalMapError::UnknownDevice`] for a bad prefix.
    pub fn parse(s: &str) -> SignalMapResult<Self> {
        let (dev, id) = s
            .split_once(':')
            .ok_or_else(|| SignalMapError::MalformedKey(s.to_string()))?;
        if id.is_empty() {
            return Err(SignalMapError::MalformedKey(s.to_string()));
        }
        Ok(Self {
            device: dev.parse()?,
            id: id.to_string(),
        })
    }
}

impl fmt::Display for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.id)
    }
}

impl Serialize for SignalKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SignalKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrip() {
        let key = SignalKey::new(DeviceKind::Stick, "joy_x");
        assert_eq!(key.to_string(), "stick:joy_x");
        assert_eq!(SignalKey::parse("stick:joy_x").expect("parse"), key);
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        assert!(matches!(
            SignalKey::parse("joy_x"),
            Err(SignalMapError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_device() {
        assert!(matches!(
            SignalKey::parse("pedals:brake"),
            Err(SignalMapError::UnknownDevice(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_id() {
        assert!(matches!(
            SignalKey::parse("stick:"),
            Err(SignalMapError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let key = SignalKey::new(DeviceKind::Throttle, "thumb_joy_x");
        let json = serde_json::to_string(&key).expect("serialize");
        assert_eq!(json, "\"throttle:thumb_joy_x\"");
        let back: SignalKey = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, key);
    }

    #[test]
    fn test_same_id_different_device_are_distinct() {
        let a = SignalKey::new(DeviceKind::Stick, "e");
        let b = SignalKey::new(DeviceKind::Throttle, "e");
        assert_ne!(a, b);
    }
}
