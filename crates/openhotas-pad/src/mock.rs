//! Mock output backends for tests.

use crate::report::PadReport;
use crate::synthetic::{KeyRepeatTiming, SyntheticInput};
use crate::virtual_pad::VirtualPad;
use crate::{PadError, PadResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory [`VirtualPad`] that records every update.
#[derive(Debug, Default)]
pub struct MockVirtualPad {
    connected: AtomicBool,
    plugged: AtomicBool,
    fail_plug_with: Mutex<Option<PadError>>,
    fail_update_with: Mutex<Option<PadError>>,
    updates: Mutex<Vec<PadReport>>,
    last_error: Mutex<Option<String>>,
}

impl MockVirtualPad {
    /// Create a healthy mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `plug_target` calls fail with `error`.
    pub fn fail_plug(&self, error: PadError) {
        *self.lock(&self.fail_plug_with) = Some(error);
    }

    /// Make `update` calls fail with `error` until cleared.
    pub fn fail_updates(&self, error: Option<PadError>) {
        *self.lock(&self.fail_update_with) = error;
    }

    /// All reports received so far.
    #[must_use]
    pub fn updates(&self) -> Vec<PadReport> {
        self.lock(&self.updates).clone()
    }

    /// The most recent report, if any.
    #[must_use]
    pub fn last_update(&self) -> Option<PadReport> {
        self.lock(&self.updates).last().copied()
    }

    /// Number of plug/unplug cycles is implied by updates; tests usually
    /// just need the plugged flag.
    #[must_use]
    pub fn is_plugged(&self) -> bool {
        self.plugged.load(Ordering::Acquire)
    }

    fn lock<'a, T>(&self, m: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        m.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record_error(&self, err: &PadError) {
        *self.lock(&self.last_error) = Some(err.to_string());
    }
}

impl VirtualPad for MockVirtualPad {
    fn connect(&self) -> PadResult {
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
        self.plugged.store(false, Ordering::Release);
    }

    fn plug_target(&self) -> PadResult {
        if let Some(err) = self.lock(&self.fail_plug_with).clone() {
            self.record_error(&err);
            return Err(err);
        }
        self.plugged.store(true, Ordering::Release);
        Ok(())
    }

    fn unplug_target(&self) -> PadResult {
        self.plugged.store(false, Ordering::Release);
        Ok(())
    }

    fn update(&self, report: PadReport) -> PadResult {
        if let Some(err) = self.lock(&self.fail_update_with).clone() {
            self.record_error(&err);
            return Err(err);
        }
        if !self.plugged.load(Ordering::Acquire) {
            let err = PadError::TargetNotPluggedIn;
            self.record_error(&err);
            return Err(err);
        }
        self.lock(&self.updates).push(report);
        Ok(())
    }

    fn ready(&self) -> bool {
        self.connected.load(Ordering::Acquire) && self.plugged.load(Ordering::Acquire)
    }

    fn last_error(&self) -> Option<String> {
        self.lock(&self.last_error).clone()
    }
}

/// One recorded key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Virtual-key code.
    pub vk: u32,
    /// Down (true) or up (false).
    pub down: bool,
    /// Extended flag.
    pub extended: bool,
    /// Scan code.
    pub scan_code: u16,
}

/// One recorded mouse event.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Operation token.
    pub op: String,
    /// Dispatched magnitude.
    pub magnitude: f32,
}

/// In-memory [`SyntheticInput`] that records key and mouse events.
#[derive(Debug)]
pub struct MockSyntheticInput {
    repeat: KeyRepeatTiming,
    keys: Mutex<Vec<KeyEvent>>,
    mouse: Mutex<Vec<MouseEvent>>,
}

impl MockSyntheticInput {
    /// Create with the given repeat timing.
    #[must_use]
    pub fn with_repeat(initial_delay_ms: f64, interval_ms: f64) -> Self {
        Self {
            repeat: (initial_delay_ms, interval_ms),
            keys: Mutex::new(Vec::new()),
            mouse: Mutex::new(Vec::new()),
        }
    }

    /// All key events so far.
    #[must_use]
    pub fn key_events(&self) -> Vec<KeyEvent> {
        self.keys.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// All mouse events so far.
    #[must_use]
    pub fn mouse_events(&self) -> Vec<MouseEvent> {
        self.mouse
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockSyntheticInput {
    fn default() -> Self {
        // Typical host defaults: 250 ms to first repeat, ~30 Hz after.
        Self::with_repeat(250.0, 33.0)
    }
}

impl SyntheticInput for MockSyntheticInput {
    fn key(&self, vk: u32, down: bool, extended: bool, scan_code: u16) -> PadResult {
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(KeyEvent {
                vk,
                down,
                extended,
                scan_code,
            });
        Ok(())
    }

    fn mouse(&self, op: &str, magnitude: f32) -> PadResult {
        self.mouse
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(MouseEvent {
                op: op.to_string(),
                magnitude,
            });
        Ok(())
    }

    fn query_key_repeat(&self) -> KeyRepeatTiming {
        self.repeat
    }
}
