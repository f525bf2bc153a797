//! Per-subsystem health surface.

use std::sync::Mutex;

/// Health of one subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubsystemStatus {
    /// Operating normally.
    #[default]
    Ok,
    /// Running with reduced function; reason attached.
    Degraded(String),
    /// Stopped; explicit intervention required.
    Fatal(String),
}

impl SubsystemStatus {
    /// Whether the subsystem is usable (ok or degraded).
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !matches!(self, Self::Fatal(_))
    }
}

/// The subsystems the core reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    /// The acquisition loop and device reads.
    Acquisition,
    /// The virtual-gamepad output path.
    VirtualOutput,
    /// Keyboard/mouse injection.
    SyntheticInput,
}

/// Thread-safe status per subsystem, polled by consumers.
///
/// Status strings change rarely (transitions only); a mutex per slot keeps
/// this simple and the tick path only touches it on transition.
#[derive(Debug, Default)]
pub struct StatusBoard {
    acquisition: Mutex<SubsystemStatus>,
    virtual_output: Mutex<SubsystemStatus>,
    synthetic_input: Mutex<SubsystemStatus>,
}

impl StatusBoard {
    /// Create a board with everything `Ok`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one subsystem's status.
    #[must_use]
    pub fn get(&self, subsystem: Subsystem) -> SubsystemStatus {
        self.slot(subsystem)
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Set one subsystem's status. Logs transitions.
    pub fn set(&self, subsystem: Subsystem, status: SubsystemStatus) {
        let mut slot = self
            .slot(subsystem)
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if *slot != status {
            match &status {
                SubsystemStatus::Ok => tracing::info!(?subsystem, "subsystem recovered"),
                SubsystemStatus::Degraded(reason) => {
                    tracing::warn!(?subsystem, %reason, "subsystem degraded");
                }
                SubsystemStatus::Fatal(reason) => {
                    tracing::error!(?subsystem, %reason, "subsystem failed");
                }
            }
            *slot = status;
        }
    }

    fn slot(&self, subsystem: Subsystem) -> &Mutex<SubsystemStatus> {
        match subsystem {
            Subsystem::Acquisition => &self.acquisition,
            Subsystem::VirtualOutput => &self.virtual_output,
            Subsystem::SyntheticInput => &self.synthetic_input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_ok() {
        let board = StatusBoard::new();
        assert_eq!(board.get(Subsystem::Acquisition), SubsystemStatus::Ok);
        assert!(board.get(Subsystem::VirtualOutput).is_usable());
    }

    #[test]
    fn test_set_and_get() {
        let board = StatusBoard::new();
        board.set(
            Subsystem::VirtualOutput,
            SubsystemStatus::Degraded("NO_FREE_SLOT".into()),
        );
        assert_eq!(
            board.get(Subsystem::VirtualOutput),
            SubsystemStatus::Degraded("NO_FREE_SLOT".into())
        );
        assert!(board.get(Subsystem::VirtualOutput).is_usable());

        board.set(
            Subsystem::VirtualOutput,
            SubsystemStatus::Fatal("bus gone".into()),
        );
        assert!(!board.get(Subsystem::VirtualOutput).is_usable());
    }
}
