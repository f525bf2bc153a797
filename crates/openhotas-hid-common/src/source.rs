//! The device-source contract.

use crate::HidSourceResult;
use openhotas_signal_map::DeviceKind;

/// Identity of one enumerable HID device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Opaque OS path used to open the device.
    pub path: String,
    /// Which pipeline role the device fills.
    pub kind: DeviceKind,
    /// Human-readable product name, when the OS offers one.
    pub product_name: Option<String>,
}

impl DeviceIdentity {
    /// Build an identity.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            path: path.into(),
            kind,
            product_name: None,
        }
    }

    /// Attach a product name.
    #[must_use]
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Display string for logs and UIs.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .unwrap_or_else(|| self.path.clone())
    }
}

/// Opaque handle to an opened device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle(pub u64);

/// Contract the OS HID layer implements.
///
/// Implementations own their reader threads and blocking I/O. Blocking reads
/// must time out within 200 ms so shutdown stays bounded;
/// [`DeviceSource::read_latest`] never blocks longer than that and returns
/// `None` for reports older than the 500 ms staleness threshold.
pub trait DeviceSource: Send + Sync {
    /// List the devices currently present.
    fn enumerate(&self) -> Vec<DeviceIdentity>;

    /// Open a device by path and start reading it.
    ///
    /// # Errors
    ///
    /// [`crate::HidSourceError::DeviceNotFound`] or
    /// [`crate::HidSourceError::OpenFailed`].
    fn open(&self, path: &str) -> HidSourceResult<SourceHandle>;

    /// Stop reading and release a device.
    fn close(&self, handle: SourceHandle);

    /// The most recent fresh report for a device: `(bytes, timestamp_sec)`.
    ///
    /// Returns `None` when no report has arrived yet or the newest one is
    /// stale.
    fn read_latest(&self, handle: SourceHandle) -> Option<(Vec<u8>, f64)>;

    /// Whether the device is still attached.
    fn connected(&self, handle: SourceHandle) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_display_name() {
        let id = DeviceIdentity::new("/dev/hidraw3", DeviceKind::Stick);
        assert_eq!(id.display_name(), "/dev/hidraw3");
        let id = id.with_product_name("X56 Stick");
        assert_eq!(id.display_name(), "X56 Stick");
    }
}
