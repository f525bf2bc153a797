//! The virtual-gamepad backend contract.

use crate::report::PadReport;
use crate::PadResult;

/// Contract a virtual-gamepad driver client implements.
///
/// The publisher drives the enable state machine through `plug_target` /
/// `unplug_target` (a re-plug forces the host to re-enumerate the pad) and
/// calls [`VirtualPad::update`] once per tick while output is enabled.
/// Transient update errors are surfaced as status, not torn down.
pub trait VirtualPad: Send + Sync {
    /// Connect to the driver/bus.
    ///
    /// # Errors
    ///
    /// [`crate::PadError::BusNotFound`] when the driver is absent.
    fn connect(&self) -> PadResult;

    /// Disconnect from the driver/bus.
    fn disconnect(&self);

    /// Add the virtual target to the bus.
    ///
    /// # Errors
    ///
    /// [`crate::PadError::NoFreeSlot`] or [`crate::PadError::BusNotFound`].
    fn plug_target(&self) -> PadResult;

    /// Remove the virtual target from the bus.
    ///
    /// # Errors
    ///
    /// Backend-specific removal failures.
    fn unplug_target(&self) -> PadResult;

    /// Push a report to the virtual target.
    ///
    /// # Errors
    ///
    /// [`crate::PadError::UpdateFailed`] and friends; the publisher records
    /// the message and retries next tick.
    fn update(&self, report: PadReport) -> PadResult;

    /// Whether the backend is connected and the target plugged.
    fn ready(&self) -> bool;

    /// The most recent backend error string, if any.
    fn last_error(&self) -> Option<String>;
}
