//! Output publication: virtual pad, keyboard auto-repeat, mouse dispatch.

use crate::error::TickFault;
use crate::status::{StatusBoard, Subsystem, SubsystemStatus};
use openhotas_atomic::EventQueue;
use openhotas_mapping::{AxisId, ButtonId, MouseOpKind, ResolvedOutputs};
use openhotas_pad::{
    axis_to_wire, scan_code_for_vk, trigger_to_wire, PadReport, SyntheticInput, VirtualPad,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Virtual-output lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputState {
    /// Output off; reports are not sent.
    #[default]
    Disabled,
    /// Enable requested; re-plug in progress.
    Enabling,
    /// Output live.
    Enabled,
    /// Disable requested; neutral report pending.
    Disabling,
}

/// Per-key auto-repeat state.
#[derive(Debug, Clone, Copy)]
struct KeyRepeatState {
    press_time: f64,
    next_repeat: f64,
}

/// Publishes resolved outputs to the virtual pad and the OS input queue.
///
/// Owns the output-enable state machine, the per-key repeat schedule and the
/// mouse edge tracking. Lives on the acquisition thread; everything here is
/// tick-driven and deterministic given the sequence of `(t, outputs)` calls.
pub struct Publisher {
    pad: Arc<dyn VirtualPad>,
    input: Arc<dyn SyntheticInput>,
    state: OutputState,
    repeat_timing: Option<(f64, f64)>,
    pressed: HashMap<u32, KeyRepeatState>,
    mouse_active: HashSet<String>,
    test_pulse_armed: bool,
}

impl Publisher {
    /// Build a publisher over the two output backends.
    #[must_use]
    pub fn new(pad: Arc<dyn VirtualPad>, input: Arc<dyn SyntheticInput>) -> Self {
        Self {
            pad,
            input,
            state: OutputState::Disabled,
            repeat_timing: None,
            pressed: HashMap::new(),
            mouse_active: HashSet::new(),
            test_pulse_armed: false,
        }
    }

    /// Current output state.
    #[must_use]
    pub fn output_state(&self) -> OutputState {
        self.state
    }

    /// Arm the one-shot test pulse for the next published report.
    pub fn arm_test_pulse(&mut self) {
        self.test_pulse_armed = true;
    }

    /// When `vk` is currently pressed, the time its press was emitted.
    #[must_use]
    pub fn pressed_since(&self, vk: u32) -> Option<f64> {
        self.pressed.get(&vk).map(|state| state.press_time)
    }

    /// Publish one tick.
    ///
    /// `enabled` is the control surface's desire; the publisher walks its
    /// state machine toward it. Returns `false` when a fatal enable failure
    /// consumed the desire (the caller clears the control flag so re-enabling
    /// takes an explicit new request).
    pub fn tick(
        &mut self,
        t: f64,
        outputs: &ResolvedOutputs,
        enabled: bool,
        faults: &EventQueue<TickFault>,
        status: &StatusBoard,
    ) -> bool {
        let mut keep_desire = true;

        // Output-enable state machine.
        match (self.state, enabled) {
            (OutputState::Disabled, true) => {
                self.state = OutputState::Enabling;
                if self.try_enable(status) {
                    self.state = OutputState::Enabled;
                } else {
                    self.state = OutputState::Disabled;
                    faults.push(TickFault::EnableFailed);
                    keep_desire = false;
                }
            }
            (OutputState::Enabled, false) => {
                self.state = OutputState::Disabling;
                let _ = self.pad.update(PadReport::neutral());
                self.state = OutputState::Disabled;
                status.set(Subsystem::VirtualOutput, SubsystemStatus::Ok);
            }
            _ => {}
        }

        if self.state == OutputState::Enabled {
            let report = self.build_report(outputs);
            match self.pad.update(report) {
                Ok(()) => {
                    status.set(Subsystem::VirtualOutput, SubsystemStatus::Ok);
                }
                Err(err) => {
                    // Transient: keep output enabled and retry next tick.
                    faults.push(TickFault::PadUpdateFailed);
                    status.set(
                        Subsystem::VirtualOutput,
                        SubsystemStatus::Degraded(err.to_string()),
                    );
                }
            }
        }

        self.tick_keyboard(t, outputs, faults, status);
        self.tick_mouse(outputs, faults, status);

        keep_desire
    }

    /// Release everything on shutdown: key-ups for all pressed keys, a
    /// neutral report, then disconnect.
    pub fn shutdown(&mut self) {
        let pressed: Vec<u32> = self.pressed.keys().copied().collect();
        for vk in pressed {
            self.emit_key(vk, false);
        }
        self.pressed.clear();
        if self.state == OutputState::Enabled {
            let _ = self.pad.update(PadReport::neutral());
            let _ = self.pad.unplug_target();
        }
        self.pad.disconnect();
        self.state = OutputState::Disabled;
    }

    fn try_enable(&mut self, status: &StatusBoard) -> bool {
        if let Err(err) = self.pad.connect() {
            status.set(Subsystem::VirtualOutput, SubsystemStatus::Fatal(err.to_string()));
            return false;
        }
        // Re-plug so the host re-enumerates the pad, then force one neutral
        // report out.
        let _ = self.pad.unplug_target();
        if let Err(err) = self.pad.plug_target() {
            status.set(Subsystem::VirtualOutput, SubsystemStatus::Fatal(err.to_string()));
            return false;
        }
        if let Err(err) = self.pad.update(PadReport::neutral()) {
            status.set(Subsystem::VirtualOutput, SubsystemStatus::Fatal(err.to_string()));
            return false;
        }
        status.set(Subsystem::VirtualOutput, SubsystemStatus::Ok);
        true
    }

    fn build_report(&mut self, outputs: &ResolvedOutputs) -> PadReport {
        if self.test_pulse_armed {
            self.test_pulse_armed = false;
            return test_pulse_report();
        }
        let mut report = PadReport {
            buttons: 0,
            lt: trigger_to_wire(outputs.axis(AxisId::LT)),
            rt: trigger_to_wire(outputs.axis(AxisId::RT)),
            lx: axis_to_wire(outputs.axis(AxisId::LX)),
            // Report convention is opposite to logical on Y: up is negative.
            ly: axis_to_wire(-outputs.axis(AxisId::LY)),
            rx: axis_to_wire(outputs.axis(AxisId::RX)),
            ry: axis_to_wire(-outputs.axis(AxisId::RY)),
        };
        for button in ButtonId::ALL {
            report.set_button(button, outputs.button(button));
        }
        report
    }

    fn tick_keyboard(
        &mut self,
        t: f64,
        outputs: &ResolvedOutputs,
        faults: &EventQueue<TickFault>,
        status: &StatusBoard,
    ) {
        let (initial_delay, interval) = self.repeat_timing_secs();
        let desired: HashSet<u32> = outputs.keys_down.iter().copied().collect();

        // Releases first: pressed keys no longer desired.
        let released: Vec<u32> = self
            .pressed
            .keys()
            .filter(|vk| !desired.contains(vk))
            .copied()
            .collect();
        for vk in released {
            if self.emit_key(vk, false) {
                self.pressed.remove(&vk);
            } else {
                faults.push(TickFault::InjectionFailed);
                status.set(
                    Subsystem::SyntheticInput,
                    SubsystemStatus::Degraded("key-up injection failed".into()),
                );
                self.pressed.remove(&vk);
            }
        }

        for &vk in &desired {
            match self.pressed.get_mut(&vk) {
                None => {
                    // Fresh press.
                    if self.emit_key(vk, true) {
                        self.pressed.insert(
                            vk,
                            KeyRepeatState {
                                press_time: t,
                                next_repeat: t + initial_delay,
                            },
                        );
                    } else {
                        faults.push(TickFault::InjectionFailed);
                        status.set(
                            Subsystem::SyntheticInput,
                            SubsystemStatus::Degraded("key-down injection failed".into()),
                        );
                    }
                }
                Some(state) => {
                    // Auto-repeat.
                    if t >= state.next_repeat {
                        state.next_repeat = t + interval;
                        if !self.emit_key(vk, true) {
                            faults.push(TickFault::InjectionFailed);
                        }
                    }
                }
            }
        }
    }

    fn tick_mouse(
        &mut self,
        outputs: &ResolvedOutputs,
        faults: &EventQueue<TickFault>,
        status: &StatusBoard,
    ) {
        let mut active_now = HashSet::with_capacity(outputs.mouse.len());
        for (op, magnitude) in &outputs.mouse {
            active_now.insert(op.token().to_string());
            let fire = match op.kind() {
                // Clicks fire once per rising edge of activity.
                MouseOpKind::Click => !self.mouse_active.contains(op.token()),
                // Motion redispatches every active tick with the magnitude.
                MouseOpKind::Motion => true,
            };
            if fire {
                if let Err(err) = self.input.mouse(op.token(), *magnitude) {
                    faults.push(TickFault::InjectionFailed);
                    status.set(
                        Subsystem::SyntheticInput,
                        SubsystemStatus::Degraded(err.to_string()),
                    );
                }
            }
        }
        self.mouse_active = active_now;
    }

    fn repeat_timing_secs(&mut self) -> (f64, f64) {
        if self.repeat_timing.is_none() {
            let (initial_ms, interval_ms) = self.input.query_key_repeat();
            self.repeat_timing = Some((initial_ms / 1000.0, interval_ms / 1000.0));
        }
        self.repeat_timing.unwrap_or((0.25, 0.033))
    }

    fn emit_key(&self, vk: u32, down: bool) -> bool {
        let (scan_code, extended) = scan_code_for_vk(vk);
        self.input.key(vk, down, extended, scan_code).is_ok()
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("state", &self.state)
            .field("pressed_keys", &self.pressed.len())
            .finish()
    }
}

/// The recognizable pattern published by the test pulse: extreme corners on
/// both sticks, both triggers full, A+B+X+Y and the shoulders pressed.
fn test_pulse_report() -> PadReport {
    let mut report = PadReport {
        buttons: 0,
        lt: 255,
        rt: 255,
        lx: axis_to_wire(-1.0),
        ly: axis_to_wire(-1.0), // logical +1 after inversion
        rx: axis_to_wire(1.0),
        ry: axis_to_wire(1.0), // logical -1 after inversion
    };
    for button in [
        ButtonId::A,
        ButtonId::B,
        ButtonId::X,
        ButtonId::Y,
        ButtonId::LB,
        ButtonId::RB,
    ] {
        report.set_button(button, true);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use openhotas_mapping::MouseOp;
    use openhotas_pad::{MockSyntheticInput, MockVirtualPad, PadError};

    fn fixture() -> (
        Publisher,
        Arc<MockVirtualPad>,
        Arc<MockSyntheticInput>,
        EventQueue<TickFault>,
        StatusBoard,
    ) {
        let pad = Arc::new(MockVirtualPad::new());
        let input = Arc::new(MockSyntheticInput::with_repeat(250.0, 33.0));
        let publisher = Publisher::new(
            Arc::clone(&pad) as Arc<dyn VirtualPad>,
            Arc::clone(&input) as Arc<dyn SyntheticInput>,
        );
        (publisher, pad, input, EventQueue::new(), StatusBoard::new())
    }

    fn axis_outputs(axis: AxisId, v: f32) -> ResolvedOutputs {
        let mut outputs = ResolvedOutputs::default();
        outputs.axes[axis.index()] = v;
        outputs
    }

    #[test]
    fn test_enable_plugs_and_sends_neutral() {
        let (mut publisher, pad, _input, faults, status) = fixture();
        let outputs = ResolvedOutputs::default();
        assert!(publisher.tick(0.0, &outputs, true, &faults, &status));
        assert_eq!(publisher.output_state(), OutputState::Enabled);
        assert!(pad.is_plugged());
        // Neutral report from enable plus the tick's own report.
        assert_eq!(pad.updates().len(), 2);
        assert_eq!(pad.updates()[0], PadReport::neutral());
    }

    #[test]
    fn test_enable_failure_clears_desire() {
        let (mut publisher, pad, _input, faults, status) = fixture();
        pad.fail_plug(PadError::NoFreeSlot);
        let outputs = ResolvedOutputs::default();
        assert!(!publisher.tick(0.0, &outputs, true, &faults, &status));
        assert_eq!(publisher.output_state(), OutputState::Disabled);
        assert_eq!(faults.drain(), vec![TickFault::EnableFailed]);
        assert!(!status.get(Subsystem::VirtualOutput).is_usable());
    }

    #[test]
    fn test_y_axis_inversion() {
        let (mut publisher, pad, _input, faults, status) = fixture();
        publisher.tick(0.0, &ResolvedOutputs::default(), true, &faults, &status);
        publisher.tick(
            0.001,
            &axis_outputs(AxisId::LY, 1.0),
            true,
            &faults,
            &status,
        );
        let report = pad.last_update().expect("report");
        assert_eq!(report.ly, -32768);
    }

    #[test]
    fn test_transient_update_error_keeps_output_enabled() {
        let (mut publisher, pad, _input, faults, status) = fixture();
        publisher.tick(0.0, &ResolvedOutputs::default(), true, &faults, &status);
        pad.fail_updates(Some(PadError::UpdateFailed("busy".into())));
        assert!(publisher.tick(0.001, &ResolvedOutputs::default(), true, &faults, &status));
        assert_eq!(publisher.output_state(), OutputState::Enabled);
        assert!(matches!(
            status.get(Subsystem::VirtualOutput),
            SubsystemStatus::Degraded(_)
        ));
        // Recovers on the next good update.
        pad.fail_updates(None);
        publisher.tick(0.002, &ResolvedOutputs::default(), true, &faults, &status);
        assert_eq!(status.get(Subsystem::VirtualOutput), SubsystemStatus::Ok);
    }

    #[test]
    fn test_disable_sends_neutral() {
        let (mut publisher, pad, _input, faults, status) = fixture();
        publisher.tick(0.0, &axis_outputs(AxisId::LX, 0.5), true, &faults, &status);
        publisher.tick(0.001, &ResolvedOutputs::default(), false, &faults, &status);
        assert_eq!(publisher.output_state(), OutputState::Disabled);
        assert_eq!(pad.last_update(), Some(PadReport::neutral()));
    }

    #[test]
    fn test_key_auto_repeat_schedule() {
        // S6: initial 250 ms, interval 33 ms, desired-down 1.000..1.400.
        let (mut publisher, _pad, input, faults, status) = fixture();
        let mut outputs = ResolvedOutputs::default();
        outputs.keys_down = vec![0x20];

        let mut t = 1.000;
        while t < 1.400 {
            publisher.tick(t, &outputs, false, &faults, &status);
            t += 0.001;
        }
        publisher.tick(1.400, &ResolvedOutputs::default(), false, &faults, &status);

        let events = input.key_events();
        let down_count = events.iter().filter(|e| e.down).count();
        let up_count = events.iter().filter(|e| !e.down).count();
        // down@1.000, repeats at 1.250, 1.283, 1.316, 1.349, 1.382.
        assert_eq!(down_count, 6);
        assert_eq!(up_count, 1);
        assert!(events.last().is_some_and(|e| !e.down));
    }

    #[test]
    fn test_keys_emitted_with_scan_codes() {
        let (mut publisher, _pad, input, faults, status) = fixture();
        let mut outputs = ResolvedOutputs::default();
        outputs.keys_down = vec![0x26]; // VK_UP, extended
        publisher.tick(0.5, &outputs, false, &faults, &status);
        let events = input.key_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].extended);
        assert_eq!(events[0].scan_code, 0x48);
        assert_eq!(publisher.pressed_since(0x26), Some(0.5));
    }

    #[test]
    fn test_shutdown_releases_pressed_keys() {
        let (mut publisher, _pad, input, faults, status) = fixture();
        let mut outputs = ResolvedOutputs::default();
        outputs.keys_down = vec![0x20, 0x41];
        publisher.tick(0.0, &outputs, false, &faults, &status);
        publisher.shutdown();

        let ups: Vec<u32> = input
            .key_events()
            .iter()
            .filter(|e| !e.down)
            .map(|e| e.vk)
            .collect();
        let mut sorted = ups.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0x20, 0x41]);
    }

    #[test]
    fn test_mouse_click_fires_on_edge_only() {
        let (mut publisher, _pad, input, faults, status) = fixture();
        let mut outputs = ResolvedOutputs::default();
        outputs.mouse = vec![(MouseOp::new("left_click"), 1.0)];

        publisher.tick(0.0, &outputs, false, &faults, &status);
        publisher.tick(0.001, &outputs, false, &faults, &status);
        publisher.tick(0.002, &ResolvedOutputs::default(), false, &faults, &status);
        publisher.tick(0.003, &outputs, false, &faults, &status);

        let clicks = input.mouse_events();
        assert_eq!(clicks.len(), 2); // edges at t=0.0 and t=0.003
    }

    #[test]
    fn test_mouse_motion_fires_every_tick() {
        let (mut publisher, _pad, input, faults, status) = fixture();
        let mut outputs = ResolvedOutputs::default();
        outputs.mouse = vec![(MouseOp::new("move_up"), 0.4)];

        publisher.tick(0.0, &outputs, false, &faults, &status);
        publisher.tick(0.001, &outputs, false, &faults, &status);
        publisher.tick(0.002, &outputs, false, &faults, &status);

        let moves = input.mouse_events();
        assert_eq!(moves.len(), 3);
        assert!((moves[0].magnitude - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_test_pulse_overrides_one_report() {
        let (mut publisher, pad, _input, faults, status) = fixture();
        publisher.tick(0.0, &ResolvedOutputs::default(), true, &faults, &status);
        publisher.arm_test_pulse();
        publisher.tick(0.001, &ResolvedOutputs::default(), true, &faults, &status);

        let pulse = pad.last_update().expect("report");
        assert_eq!(pulse.lt, 255);
        assert!(pulse.button(ButtonId::A));
        assert!(pulse.button(ButtonId::LB));

        publisher.tick(0.002, &ResolvedOutputs::default(), true, &faults, &status);
        assert_eq!(pad.last_update(), Some(PadReport::neutral()));
    }
}
