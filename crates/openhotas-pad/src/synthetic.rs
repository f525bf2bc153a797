//! The OS synthetic-input contract.

use crate::PadResult;

/// Host key-repeat timing: `(initial_delay_ms, interval_ms)`.
pub type KeyRepeatTiming = (f64, f64);

/// Contract the OS input-injection layer implements.
///
/// Key events carry the scan code alongside the virtual-key code so host
/// `code` semantics survive injection; extended keys (arrows, nav cluster,
/// right-side modifiers) set the extended flag.
pub trait SyntheticInput: Send + Sync {
    /// Inject a key transition.
    ///
    /// # Errors
    ///
    /// [`crate::PadError::InjectionFailed`].
    fn key(&self, vk: u32, down: bool, extended: bool, scan_code: u16) -> PadResult;

    /// Dispatch a mouse operation with a magnitude (clicks ignore it).
    ///
    /// # Errors
    ///
    /// [`crate::PadError::InjectionFailed`].
    fn mouse(&self, op: &str, magnitude: f32) -> PadResult;

    /// The host keyboard repeat settings, queried once at first use.
    fn query_key_repeat(&self) -> KeyRepeatTiming;
}
