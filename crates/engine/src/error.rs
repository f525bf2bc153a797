//! Engine error types.

use thiserror::Error;

/// Errors raised outside the tick path (construction, thread lifecycle).
#[derive(Error, Debug)]
pub enum EngineError {
    /// The acquisition thread could not be started.
    #[error("failed to spawn acquisition thread: {0}")]
    SpawnFailed(String),

    /// A clear was requested while acquisition is running.
    #[error("operation requires acquisition to be paused")]
    NotPaused,

    /// Signal-map validation failed during assembly.
    #[error(transparent)]
    SignalMap(#[from] openhotas_signal_map::SignalMapError),
}

/// Per-tick faults, reported through the event queue without allocating.
///
/// The tick never unwinds: every fault downgrades to "no update this tick"
/// for the affected unit and the loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TickFault {
    /// A device had no fresh report this tick.
    StaleReport = 1,
    /// A device report was too short for at least one descriptor.
    ShortReport = 2,
    /// The virtual-pad update failed; retrying next tick.
    PadUpdateFailed = 3,
    /// Key or mouse injection failed.
    InjectionFailed = 4,
    /// Enabling the virtual output failed fatally.
    EnableFailed = 5,
}

impl TickFault {
    /// Numeric code for compact logging.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the pipeline keeps running after this fault.
    ///
    /// Every tick fault is recoverable; fatal conditions only occur during
    /// startup and enable transitions.
    #[must_use]
    pub fn is_recoverable(self) -> bool {
        true
    }
}
