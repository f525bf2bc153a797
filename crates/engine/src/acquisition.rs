//! The acquisition core: one tick function, one loop thread.

use crate::control::{ControlSurface, SharedControls};
use crate::error::{EngineError, TickFault};
use crate::publisher::Publisher;
use crate::status::{StatusBoard, Subsystem, SubsystemStatus};
use crate::store::SignalStore;
use crate::TARGET_HZ;
use openhotas_atomic::EventQueue;
use openhotas_filters::FilterBank;
use openhotas_hid_common::{DeviceSource, SourceHandle};
use openhotas_mapping::{MapResolver, MappingTable};
use openhotas_pad::{SyntheticInput, VirtualPad};
use openhotas_scheduler::{
    apply_thread_priority, LoopStats, SharedPollStats, TickClock, TickScheduler,
};
use openhotas_signal_map::{
    is_trigger_id, DecodedSignal, DeviceKind, SignalDecoder, SignalKey, SignalMap,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

/// With no fresh reports and no connected device for this long, ask the
/// source to rescan.
const RESCAN_AFTER_SECS: f64 = 1.0;

/// Cooldown between rescans.
const RESCAN_COOLDOWN_SECS: f64 = 2.0;

#[derive(Debug)]
struct DeviceBinding {
    kind: DeviceKind,
    handle: Option<SourceHandle>,
    had_report: bool,
    short_warned: bool,
}

/// The tick-stepable pipeline.
///
/// [`Pipeline::step`] performs one complete acquisition tick:
/// read latest reports, decode, filter, fan out to rings, resolve mappings,
/// publish. The loop thread (see [`AcquisitionCore`]) calls it at 1 kHz;
/// tests call it directly with synthetic timestamps.
pub struct Pipeline {
    decoder: SignalDecoder,
    bank: FilterBank,
    store: Arc<SignalStore>,
    controls: Arc<SharedControls>,
    status: Arc<StatusBoard>,
    faults: Arc<EventQueue<TickFault>>,
    table: Arc<MappingTable>,
    resolver: MapResolver,
    resolver_generation: Option<u64>,
    publisher: Publisher,
    source: Arc<dyn DeviceSource>,
    devices: Vec<DeviceBinding>,
    values: HashMap<SignalKey, f32>,
    decoded: Vec<DecodedSignal>,
    last_report_t: f64,
    next_rescan_t: f64,
}

impl Pipeline {
    /// Assemble a pipeline over the given collaborators, with the default
    /// ring capacity (1 kHz × 60 s window plus headroom).
    #[must_use]
    pub fn new(
        map: SignalMap,
        source: Arc<dyn DeviceSource>,
        pad: Arc<dyn VirtualPad>,
        input: Arc<dyn SyntheticInput>,
        table: Arc<MappingTable>,
    ) -> Self {
        Self::with_ring_capacity(map, source, pad, input, table, crate::DEFAULT_RING_CAPACITY)
    }

    /// Assemble with an explicit ring capacity (power of two).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two >= 2.
    #[must_use]
    pub fn with_ring_capacity(
        map: SignalMap,
        source: Arc<dyn DeviceSource>,
        pad: Arc<dyn VirtualPad>,
        input: Arc<dyn SyntheticInput>,
        table: Arc<MappingTable>,
        capacity: u64,
    ) -> Self {
        let store = Arc::new(SignalStore::with_capacity(&map, capacity));
        let controls = Arc::new(SharedControls::new(&map));
        let devices = DeviceKind::all()
            .into_iter()
            .map(|kind| DeviceBinding {
                kind,
                handle: None,
                had_report: false,
                short_warned: false,
            })
            .collect();
        Self {
            decoder: SignalDecoder::new(map),
            bank: FilterBank::new(),
            store,
            controls,
            status: Arc::new(StatusBoard::new()),
            faults: Arc::new(EventQueue::new()),
            table,
            resolver: MapResolver::new(),
            resolver_generation: None,
            publisher: Publisher::new(pad, input),
            source,
            devices,
            values: HashMap::new(),
            decoded: Vec::new(),
            last_report_t: 0.0,
            next_rescan_t: 0.0,
        }
    }

    /// Enumerate the source and open the first device of each kind.
    pub fn open_devices(&mut self) {
        let identities = self.source.enumerate();
        for binding in &mut self.devices {
            if binding.handle.is_some() {
                continue;
            }
            let Some(identity) = identities.iter().find(|d| d.kind == binding.kind) else {
                continue;
            };
            match self.source.open(&identity.path) {
                Ok(handle) => {
                    tracing::info!(device = %identity.display_name(), kind = ?binding.kind, "opened device");
                    binding.handle = Some(handle);
                }
                Err(err) => {
                    tracing::warn!(device = %identity.display_name(), %err, "failed to open device");
                }
            }
        }
    }

    /// Run one acquisition tick at time `t`.
    pub fn step(&mut self, t: f64) {
        let params = self.controls.filter_params();
        let (left_digital, right_digital) = self.controls.trigger_digital();

        // Refresh the resolver's working set only when the table changed.
        let generation = self.table.generation();
        if self.resolver_generation != Some(generation) {
            self.resolver.set_entries(self.table.snapshot());
            self.resolver_generation = Some(generation);
        }

        let mut any_report = false;
        let mut any_connected = false;
        for i in 0..self.devices.len() {
            let (kind, handle) = {
                let binding = &self.devices[i];
                (binding.kind, binding.handle)
            };
            let Some(handle) = handle else {
                self.controls.set_device_connected(kind, false);
                continue;
            };
            let connected = self.source.connected(handle);
            self.controls.set_device_connected(kind, connected);
            if connected {
                any_connected = true;
            }

            match self.source.read_latest(handle) {
                Some((bytes, _arrival)) => {
                    any_report = true;
                    self.devices[i].had_report = true;
                    self.decoded.clear();
                    self.decoder.decode_device(kind, &bytes, &mut self.decoded);

                    let expected = self.decoder.map().for_device(kind).count();
                    if self.decoded.len() < expected {
                        if !self.devices[i].short_warned {
                            self.faults.push(TickFault::ShortReport);
                            self.devices[i].short_warned = true;
                        }
                    } else {
                        self.devices[i].short_warned = false;
                    }

                    self.apply_decoded(t, &params, left_digital, right_digital);
                }
                None => {
                    // No fresh report: no update this tick for this device.
                    if self.devices[i].had_report {
                        self.devices[i].had_report = false;
                        self.faults.push(TickFault::StaleReport);
                    }
                }
            }
        }

        // The published time advances every tick so consumers can tell an
        // idle device from a stalled pipeline.
        self.store.publish_latest(t);

        if any_report {
            self.last_report_t = t;
            self.status.set(Subsystem::Acquisition, SubsystemStatus::Ok);
        } else if !any_connected
            && t - self.last_report_t > RESCAN_AFTER_SECS
            && t >= self.next_rescan_t
        {
            self.status.set(
                Subsystem::Acquisition,
                SubsystemStatus::Degraded("no devices delivering reports".into()),
            );
            self.open_devices();
            self.next_rescan_t = t + RESCAN_COOLDOWN_SECS;
        }

        if self.controls.take_test_pulse() {
            self.publisher.arm_test_pulse();
        }

        let outputs = self.resolver.resolve(&self.values);
        let keep_desire = self.publisher.tick(
            t,
            &outputs,
            self.controls.output_enabled(),
            &self.faults,
            &self.status,
        );
        if !keep_desire {
            self.controls.set_output_enabled(false);
        }
    }

    fn apply_decoded(
        &mut self,
        t: f64,
        params: &openhotas_filters::FilterParams,
        left_digital: bool,
        right_digital: bool,
    ) {
        for decoded in &self.decoded {
            let Some(slot) = self.store.index_of(&decoded.key) else {
                continue;
            };
            let Some(descriptor) = self.decoder.map().get(&decoded.key) else {
                continue;
            };

            let force_binary = is_trigger_id(&decoded.key.id)
                && match decoded.key.id.as_str() {
                    "trigger" | "lt" | "left_trigger" => left_digital,
                    "rt" | "right_trigger" => right_digital,
                    _ => false,
                };

            let mode = self.controls.mode_at(slot);
            let filtered =
                self.bank
                    .apply(descriptor, mode, force_binary, t, decoded.value, params);

            self.store.push_raw(slot, t, decoded.value);
            self.store.push_filtered(slot, t, filtered);
            self.values.insert(decoded.key.clone(), filtered);
        }
    }

    /// Release pressed keys, neutralize and disconnect the outputs.
    pub fn shutdown_outputs(&mut self) {
        self.publisher.shutdown();
    }

    /// The signal store (snapshot API).
    #[must_use]
    pub fn store(&self) -> Arc<SignalStore> {
        Arc::clone(&self.store)
    }

    /// The shared controls.
    #[must_use]
    pub fn controls(&self) -> Arc<SharedControls> {
        Arc::clone(&self.controls)
    }

    /// The status board.
    #[must_use]
    pub fn status(&self) -> Arc<StatusBoard> {
        Arc::clone(&self.status)
    }

    /// The fault event queue.
    #[must_use]
    pub fn faults(&self) -> Arc<EventQueue<TickFault>> {
        Arc::clone(&self.faults)
    }

    /// Current filtered value of a signal, if it has been sampled.
    #[must_use]
    pub fn current_value(&self, key: &SignalKey) -> Option<f32> {
        self.values.get(key).copied()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("signals", &self.store.len())
            .field("publisher", &self.publisher)
            .finish()
    }
}

/// Owns the loop thread around a [`Pipeline`].
#[derive(Debug)]
pub struct AcquisitionCore;

/// Handle to a running pipeline: controls, snapshots, stats and shutdown.
pub struct PipelineHandle {
    store: Arc<SignalStore>,
    controls: ControlSurface,
    shared: Arc<SharedControls>,
    status: Arc<StatusBoard>,
    faults: Arc<EventQueue<TickFault>>,
    stats: SharedPollStats,
    join: Option<JoinHandle<()>>,
}

impl AcquisitionCore {
    /// Spawn the 1 kHz loop thread over `pipeline`.
    ///
    /// # Errors
    ///
    /// [`EngineError::SpawnFailed`] when the OS refuses the thread.
    pub fn spawn(pipeline: Pipeline) -> Result<PipelineHandle, EngineError> {
        let store = pipeline.store();
        let shared = pipeline.controls();
        let status = pipeline.status();
        let faults = pipeline.faults();

        let stats = LoopStats::new(0.0);
        let stats_reader = stats.reader();

        shared.set_running(true);
        let thread_shared = Arc::clone(&shared);
        let join = std::thread::Builder::new()
            .name("openhotas-acq".into())
            .spawn(move || run_loop(pipeline, &thread_shared, stats))
            .map_err(|e| EngineError::SpawnFailed(e.to_string()))?;

        Ok(PipelineHandle {
            store,
            controls: ControlSurface::new(Arc::clone(&shared)),
            shared,
            status,
            faults,
            stats: stats_reader,
            join: Some(join),
        })
    }
}

fn run_loop(mut pipeline: Pipeline, shared: &SharedControls, mut stats: LoopStats) {
    if let Err(err) = apply_thread_priority() {
        tracing::warn!(%err, "running at normal thread priority");
    }
    pipeline.open_devices();

    let clock = TickClock::start();
    let mut scheduler = TickScheduler::with_period_ns((1e9 / TARGET_HZ) as u64);

    while shared.running() {
        let t = clock.now_secs();
        let work_start = Instant::now();
        pipeline.step(t);
        let work_us = work_start.elapsed().as_secs_f64() * 1e6;
        stats.record(clock.now_secs(), work_us);
        // A failed coarse sleep degrades to spinning inside complete_tick.
        let _ = scheduler.complete_tick();
    }

    pipeline.shutdown_outputs();
}

impl PipelineHandle {
    /// The snapshot API.
    #[must_use]
    pub fn store(&self) -> &Arc<SignalStore> {
        &self.store
    }

    /// Thread-safe setters.
    #[must_use]
    pub fn controls(&self) -> &ControlSurface {
        &self.controls
    }

    /// Subsystem status.
    #[must_use]
    pub fn status(&self) -> &Arc<StatusBoard> {
        &self.status
    }

    /// Tick fault events for the log drain.
    #[must_use]
    pub fn faults(&self) -> &Arc<EventQueue<TickFault>> {
        &self.faults
    }

    /// Loop statistics reader.
    #[must_use]
    pub fn stats(&self) -> &SharedPollStats {
        &self.stats
    }

    /// Whether a device of `kind` is currently connected.
    #[must_use]
    pub fn device_connected(&self, kind: DeviceKind) -> bool {
        self.shared.device_connected(kind)
    }

    /// Whether the loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running()
    }

    /// Reset every ring and the published time.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotPaused`] while the loop is running; ring clears are
    /// not concurrent-safe with the writer.
    pub fn clear(&self) -> Result<(), EngineError> {
        if self.is_running() {
            return Err(EngineError::NotPaused);
        }
        self.store.clear();
        Ok(())
    }

    /// Stop the loop and join the thread.
    ///
    /// The loop observes the flag within one tick; shutdown completes within
    /// two tick periods plus the outstanding device read.
    pub fn stop(&mut self) {
        self.shared.set_running(false);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                tracing::error!("acquisition thread panicked during shutdown");
            }
        }
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("running", &self.is_running())
            .finish()
    }
}
