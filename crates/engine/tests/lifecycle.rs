//! Loop-thread lifecycle: spawn, run against mock devices, stop cleanly.

use openhotas_engine::prelude::*;
use openhotas_hid_common::mock::MockDeviceSource;
use openhotas_mapping::MappingTable;
use openhotas_pad::{MockSyntheticInput, MockVirtualPad, SyntheticInput, VirtualPad};
use openhotas_signal_map::{DeviceKind, SignalKey, SignalMap};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn spawned_loop_runs_and_stops() {
    let source = Arc::new(MockDeviceSource::new());
    let stick = source.add_device("mock/stick", DeviceKind::Stick);
    let pad = Arc::new(MockVirtualPad::new());
    let input = Arc::new(MockSyntheticInput::default());
    let table = Arc::new(MappingTable::new());

    let pipeline = Pipeline::with_ring_capacity(
        SignalMap::builtin_default(),
        source,
        pad as Arc<dyn VirtualPad>,
        input as Arc<dyn SyntheticInput>,
        table,
        1 << 10,
    );
    let mut handle = AcquisitionCore::spawn(pipeline).expect("spawn");
    assert!(handle.is_running());

    // Feed one report so the loop has real work.
    stick.publish_report(&[0u8; 12], 0.0);
    std::thread::sleep(Duration::from_millis(150));

    // The loop has been writing samples and publishing time.
    let store = handle.store().clone();
    assert!(store.latest_time() > 0.0);
    let joy_x = SignalKey::new(DeviceKind::Stick, "joy_x");
    assert!(!store.snapshot_raw(&joy_x).is_empty());

    // Stats were published at least once after 100 ms.
    let stats = handle.stats().read();
    assert!(stats.effective_hz > 0.0);

    handle.stop();
    assert!(!handle.is_running());

    // Clear is allowed once paused.
    handle.clear().expect("clear after stop");
    assert_eq!(store.latest_time(), 0.0);
}

#[test]
fn clear_refused_while_running() {
    let source = Arc::new(MockDeviceSource::new());
    let pad = Arc::new(MockVirtualPad::new());
    let input = Arc::new(MockSyntheticInput::default());
    let table = Arc::new(MappingTable::new());

    let pipeline = Pipeline::with_ring_capacity(
        SignalMap::builtin_default(),
        source,
        pad as Arc<dyn VirtualPad>,
        input as Arc<dyn SyntheticInput>,
        table,
        1 << 10,
    );
    let mut handle = AcquisitionCore::spawn(pipeline).expect("spawn");
    assert!(matches!(handle.clear(), Err(EngineError::NotPaused)));
    handle.stop();
}
