//! Mapping entries.

use crate::action::Action;
use openhotas_signal_map::SignalKey;

/// Default deadband applied to axis/trigger targets when a profile record
/// does not carry one.
pub const DEFAULT_AXIS_DEADBAND: f32 = 0.05;

/// One user-authored mapping from a HOTAS signal to an output action.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    /// Unique mapping id; the upsert key.
    pub id: String,
    /// Source signal.
    pub signal_key: SignalKey,
    /// Output target.
    pub action: Action,
    /// Resolution priority; higher wins first.
    pub priority: i32,
    /// Magnitude below which the signal is treated as idle, >= 0.
    pub deadband: f32,
}

impl MappingEntry {
    /// Build an entry with explicit priority and deadband.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        signal_key: SignalKey,
        action: Action,
        priority: i32,
        deadband: f32,
    ) -> Self {
        Self {
            id: id.into(),
            signal_key,
            action,
            priority,
            deadband: deadband.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::AxisId;
    use openhotas_signal_map::DeviceKind;

    #[test]
    fn test_negative_deadband_clamped() {
        let entry = MappingEntry::new(
            "m1",
            SignalKey::new(DeviceKind::Stick, "joy_x"),
            Action::Axis(AxisId::LX),
            0,
            -0.5,
        );
        assert_eq!(entry.deadband, 0.0);
    }
}
