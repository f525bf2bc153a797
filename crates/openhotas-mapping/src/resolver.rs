//! Per-tick resolution of mappings against current signal values.

use crate::action::{Action, AxisId, ButtonId, MouseOp};
use crate::entry::MappingEntry;
use openhotas_signal_map::SignalKey;
use std::collections::HashMap;

/// Signal value a button mapping must exceed to count as pressed.
const BUTTON_THRESHOLD: f32 = 0.5;

/// Magnitude a key/mouse mapping must exceed to count as active.
const ACTION_THRESHOLD: f32 = 0.01;

/// Resolved outputs for one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedOutputs {
    /// Axis values indexed by [`AxisId::index`].
    pub axes: [f32; 6],
    /// Button states indexed by [`ButtonId::index`].
    pub buttons: [bool; ButtonId::COUNT],
    /// Desired-down virtual keys, sorted and deduplicated.
    pub keys_down: Vec<u32>,
    /// Active mouse operations with their magnitudes, sorted by token.
    pub mouse: Vec<(MouseOp, f32)>,
}

impl ResolvedOutputs {
    /// Value of one axis.
    #[must_use]
    pub fn axis(&self, axis: AxisId) -> f32 {
        self.axes[axis.index()]
    }

    /// State of one button.
    #[must_use]
    pub fn button(&self, button: ButtonId) -> bool {
        self.buttons[button.index()]
    }
}

/// Groups mappings by output target and resolves a value per target each
/// tick.
///
/// Within a group, mappings are ordered by priority descending with ties
/// broken by id, so resolution is deterministic for any table content.
///
/// Axis groups: the first mapping (in priority order) whose signal magnitude
/// exceeds its own deadband wins. When none does, the group falls back to the
/// value with the largest magnitude, sign preserved. Signals that have never
/// been sampled read as 0.
///
/// Button groups: pressed iff any mapping's value exceeds 0.5 (an OR;
/// priority only fixes enumeration order).
///
/// Key and mouse groups: active iff any mapping's magnitude exceeds 0.01; a
/// mouse op's magnitude is the largest magnitude among its active mappings.
#[derive(Debug, Default)]
pub struct MapResolver {
    sorted: Vec<MappingEntry>,
}

impl MapResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working set from a table snapshot.
    ///
    /// Sorting happens here, once per table edit, not per tick.
    pub fn set_entries(&mut self, mut entries: Vec<MappingEntry>) {
        entries.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.id.cmp(&b.id))
        });
        self.sorted = entries;
    }

    /// Current working set, in resolution order.
    #[must_use]
    pub fn entries(&self) -> &[MappingEntry] {
        &self.sorted
    }

    /// Resolve all outputs from the current signal values.
    #[must_use]
    pub fn resolve(&self, values: &HashMap<SignalKey, f32>) -> ResolvedOutputs {
        let mut out = ResolvedOutputs::default();

        let value_of = |key: &SignalKey| values.get(key).copied().unwrap_or(0.0);

        // Axes: first-past-deadband in priority order, else max magnitude.
        for axis in AxisId::ALL {
            let mut winner: Option<f32> = None;
            let mut fallback = 0.0f32;
            for entry in self
                .sorted
                .iter()
                .filter(|e| e.action == Action::Axis(axis))
            {
                let v = value_of(&entry.signal_key);
                if winner.is_none() && v.abs() > entry.deadband {
                    winner = Some(v);
                }
                if v.abs() > fallback.abs() {
                    fallback = v;
                }
            }
            out.axes[axis.index()] = winner.unwrap_or(fallback);
        }

        // Buttons: OR over the group.
        for entry in &self.sorted {
            if let Action::Button(button) = entry.action {
                if value_of(&entry.signal_key) > BUTTON_THRESHOLD {
                    out.buttons[button.index()] = true;
                }
            }
        }

        // Keys: OR over |v| > threshold.
        for entry in &self.sorted {
            if let Action::Key(key) = entry.action {
                if value_of(&entry.signal_key).abs() > ACTION_THRESHOLD {
                    out.keys_down.push(key.code());
                }
            }
        }
        out.keys_down.sort_unstable();
        out.keys_down.dedup();

        // Mouse: OR with the largest active magnitude per op.
        let mut mouse: HashMap<&MouseOp, f32> = HashMap::new();
        for entry in &self.sorted {
            if let Action::Mouse(ref op) = entry.action {
                let v = value_of(&entry.signal_key).abs();
                if v > ACTION_THRESHOLD {
                    let slot = mouse.entry(op).or_insert(0.0);
                    if v > *slot {
                        *slot = v;
                    }
                }
            }
        }
        out.mouse = mouse
            .into_iter()
            .map(|(op, mag)| (op.clone(), mag))
            .collect();
        out.mouse.sort_by(|a, b| a.0.cmp(&b.0));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::VirtualKey;
    use openhotas_signal_map::DeviceKind;

    fn key(device: DeviceKind, id: &str) -> SignalKey {
        SignalKey::new(device, id)
    }

    fn axis_entry(id: &str, signal: SignalKey, priority: i32, deadband: f32) -> MappingEntry {
        MappingEntry::new(id, signal, Action::Axis(AxisId::LX), priority, deadband)
    }

    fn resolver_with(entries: Vec<MappingEntry>) -> MapResolver {
        let mut r = MapResolver::new();
        r.set_entries(entries);
        r
    }

    #[test]
    fn test_axis_priority_resolution() {
        // S4: stick joy_x at priority 10, throttle thumb_joy_x at priority 5,
        // both deadband 0.05.
        let stick = key(DeviceKind::Stick, "joy_x");
        let throttle = key(DeviceKind::Throttle, "thumb_joy_x");
        let resolver = resolver_with(vec![
            axis_entry("m1", stick.clone(), 10, 0.05),
            axis_entry("m2", throttle.clone(), 5, 0.05),
        ]);

        // High-priority signal inside its deadband: falls through.
        let mut values = HashMap::new();
        values.insert(stick.clone(), 0.03);
        values.insert(throttle.clone(), 0.40);
        assert_eq!(resolver.resolve(&values).axis(AxisId::LX), 0.40);

        // High-priority signal beyond its deadband: wins outright.
        values.insert(stick, 0.10);
        assert_eq!(resolver.resolve(&values).axis(AxisId::LX), 0.10);
    }

    #[test]
    fn test_axis_fallback_max_magnitude_preserves_sign() {
        let a = key(DeviceKind::Stick, "joy_x");
        let b = key(DeviceKind::Throttle, "thumb_joy_x");
        let resolver = resolver_with(vec![
            axis_entry("m1", a.clone(), 10, 0.5),
            axis_entry("m2", b.clone(), 5, 0.5),
        ]);
        let mut values = HashMap::new();
        values.insert(a, 0.1);
        values.insert(b, -0.3);
        // Neither exceeds its deadband; -0.3 has the larger magnitude.
        assert_eq!(resolver.resolve(&values).axis(AxisId::LX), -0.3);
    }

    #[test]
    fn test_axis_all_idle_yields_zero() {
        let resolver = resolver_with(vec![axis_entry(
            "m1",
            key(DeviceKind::Stick, "joy_x"),
            0,
            0.05,
        )]);
        let values = HashMap::new();
        assert_eq!(resolver.resolve(&values).axis(AxisId::LX), 0.0);
    }

    #[test]
    fn test_priority_tie_broken_by_id() {
        let a = key(DeviceKind::Stick, "joy_x");
        let b = key(DeviceKind::Stick, "joy_y");
        let resolver = resolver_with(vec![
            axis_entry("zeta", b.clone(), 5, 0.05),
            axis_entry("alpha", a.clone(), 5, 0.05),
        ]);
        let mut values = HashMap::new();
        values.insert(a, 0.2);
        values.insert(b, 0.9);
        // Same priority: "alpha" enumerates first and exceeds its deadband.
        assert_eq!(resolver.resolve(&values).axis(AxisId::LX), 0.2);
    }

    #[test]
    fn test_button_or_semantics() {
        // S5: two mappings on A with values 0.0 and 0.7 -> pressed.
        let a = key(DeviceKind::Stick, "a");
        let b = key(DeviceKind::Throttle, "e");
        let mk = |id: &str, sig: SignalKey| {
            MappingEntry::new(id, sig, Action::Button(ButtonId::A), 0, 0.0)
        };
        let resolver = resolver_with(vec![mk("m1", a.clone()), mk("m2", b.clone())]);
        let mut values = HashMap::new();
        values.insert(a, 0.0);
        values.insert(b, 0.7);
        assert!(resolver.resolve(&values).button(ButtonId::A));
    }

    #[test]
    fn test_button_below_threshold_not_pressed() {
        let a = key(DeviceKind::Stick, "a");
        let resolver = resolver_with(vec![MappingEntry::new(
            "m1",
            a.clone(),
            Action::Button(ButtonId::A),
            0,
            0.0,
        )]);
        let mut values = HashMap::new();
        values.insert(a, 0.5); // not strictly greater
        assert!(!resolver.resolve(&values).button(ButtonId::A));
    }

    #[test]
    fn test_keys_deduplicated_and_sorted() {
        let a = key(DeviceKind::Stick, "a");
        let b = key(DeviceKind::Stick, "b");
        let mk = |id: &str, sig: SignalKey, vk: u32| {
            MappingEntry::new(id, sig, Action::Key(VirtualKey(vk)), 0, 0.0)
        };
        let resolver = resolver_with(vec![
            mk("m1", a.clone(), 0x20),
            mk("m2", b.clone(), 0x20),
            mk("m3", a.clone(), 0x41),
        ]);
        let mut values = HashMap::new();
        values.insert(a, 1.0);
        values.insert(b, 1.0);
        assert_eq!(resolver.resolve(&values).keys_down, vec![0x20, 0x41]);
    }

    #[test]
    fn test_unknown_signal_reads_zero() {
        let resolver = resolver_with(vec![MappingEntry::new(
            "m1",
            key(DeviceKind::Stick, "ghost"),
            Action::Key(VirtualKey(0x20)),
            0,
            0.0,
        )]);
        let values = HashMap::new();
        assert!(resolver.resolve(&values).keys_down.is_empty());
    }

    #[test]
    fn test_mouse_magnitude_is_max_active() {
        let a = key(DeviceKind::Stick, "joy_x");
        let b = key(DeviceKind::Stick, "joy_y");
        let mk = |id: &str, sig: SignalKey| {
            MappingEntry::new(id, sig, Action::Mouse(MouseOp::new("move_up")), 0, 0.0)
        };
        let resolver = resolver_with(vec![mk("m1", a.clone()), mk("m2", b.clone())]);
        let mut values = HashMap::new();
        values.insert(a, 0.2);
        values.insert(b, -0.6);
        let out = resolver.resolve(&values);
        assert_eq!(out.mouse.len(), 1);
        assert_eq!(out.mouse[0].0.token(), "move_up");
        assert!((out.mouse[0].1 - 0.6).abs() < 1e-6);
    }
}
