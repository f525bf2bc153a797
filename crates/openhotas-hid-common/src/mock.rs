//! Scriptable device source for tests.

use crate::cell::{ReportCell, STALENESS_SECS};
use crate::source::{DeviceIdentity, DeviceSource, SourceHandle};
use crate::{HidSourceError, HidSourceResult};
use openhotas_signal_map::DeviceKind;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

struct MockDevice {
    identity: DeviceIdentity,
    cell: Arc<ReportCell>,
    connected: Arc<AtomicBool>,
}

/// In-memory [`DeviceSource`] driven directly by tests.
///
/// Tests add devices, then push timestamped reports; the acquisition core
/// sees exactly what a real reader thread would have published, staleness
/// included.
#[derive(Default)]
pub struct MockDeviceSource {
    devices: Mutex<Vec<MockDevice>>,
    open: Mutex<HashMap<u64, usize>>,
    next_handle: AtomicU64,
}

impl MockDeviceSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device and return handles for scripting it.
    pub fn add_device(&self, path: &str, kind: DeviceKind) -> MockDeviceHandle {
        let cell = Arc::new(ReportCell::new());
        let connected = Arc::new(AtomicBool::new(true));
        let device = MockDevice {
            identity: DeviceIdentity::new(path, kind),
            cell: Arc::clone(&cell),
            connected: Arc::clone(&connected),
        };
        let mut devices = self.lock_devices();
        devices.push(device);
        MockDeviceHandle { cell, connected }
    }

    fn lock_devices(&self) -> std::sync::MutexGuard<'_, Vec<MockDevice>> {
        self.devices.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_open(&self) -> std::sync::MutexGuard<'_, HashMap<u64, usize>> {
        self.open.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Test-side handle for one mock device.
#[derive(Clone)]
pub struct MockDeviceHandle {
    cell: Arc<ReportCell>,
    connected: Arc<AtomicBool>,
}

impl MockDeviceHandle {
    /// Publish a raw report at time `t`.
    pub fn publish_report(&self, bytes: &[u8], t: f64) {
        self.cell.publish(bytes, t);
    }

    /// Simulate unplugging (or re-plugging) the device.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
        if !connected {
            self.cell.invalidate();
        }
    }
}

impl DeviceSource for MockDeviceSource {
    fn enumerate(&self) -> Vec<DeviceIdentity> {
        self.lock_devices()
            .iter()
            .filter(|d| d.connected.load(Ordering::Acquire))
            .map(|d| d.identity.clone())
            .collect()
    }

    fn open(&self, path: &str) -> HidSourceResult<SourceHandle> {
        let devices = self.lock_devices();
        let index = devices
            .iter()
            .position(|d| d.identity.path == path)
            .ok_or_else(|| HidSourceError::DeviceNotFound(path.to_string()))?;
        if !devices[index].connected.load(Ordering::Acquire) {
            return Err(HidSourceError::OpenFailed(path.to_string()));
        }
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.lock_open().insert(handle, index);
        Ok(SourceHandle(handle))
    }

    fn close(&self, handle: SourceHandle) {
        self.lock_open().remove(&handle.0);
    }

    fn read_latest(&self, handle: SourceHandle) -> Option<(Vec<u8>, f64)> {
        let index = *self.lock_open().get(&handle.0)?;
        let devices = self.lock_devices();
        let device = devices.get(index)?;
        let now = device.cell.latest_time()?;
        device.cell.read_fresh(now, STALENESS_SECS)
    }

    fn connected(&self, handle: SourceHandle) -> bool {
        let open = self.lock_open();
        let Some(&index) = open.get(&handle.0) else {
            return false;
        };
        let devices = self.lock_devices();
        devices
            .get(index)
            .is_some_and(|d| d.connected.load(Ordering::Acquire))
    }
}
