//! OpenHotas acquisition core.
//!
//! One thread runs the whole hot path at a fixed 1 kHz: pull the latest raw
//! report per device, decode it through the bit-map, filter each signal, fan
//! the samples out to the raw and filtered rings, resolve the mapping table
//! against the fresh values, and publish the result to the virtual pad and
//! the OS input queue.
//!
//! Module map:
//!
//! - [`store`]: per-signal ring pairs and the windowed snapshot API
//! - [`control`]: hot-swappable shared controls (modes, params, flags)
//! - [`publisher`]: virtual-pad assembly, keyboard auto-repeat, mouse dispatch
//! - [`acquisition`]: the tick function and the loop thread
//! - [`config`]: runtime configuration with range clamping
//! - [`status`]: per-subsystem health surface
//!
//! The acquisition core exclusively owns filter state and ring write ends;
//! everything else holds read-only handles.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod acquisition;
pub mod config;
pub mod control;
pub mod error;
pub mod prelude;
pub mod publisher;
pub mod status;
pub mod store;

pub use acquisition::{AcquisitionCore, Pipeline, PipelineHandle};
pub use config::RuntimeConfig;
pub use control::{ControlSurface, SharedControls};
pub use error::{EngineError, TickFault};
pub use publisher::Publisher;
pub use status::{StatusBoard, Subsystem, SubsystemStatus};
pub use store::SignalStore;

/// Default ring capacity: 1 kHz for the 60 s maximum window, with headroom.
pub const DEFAULT_RING_CAPACITY: u64 = 1 << 19;

/// Fixed acquisition rate.
pub const TARGET_HZ: f64 = 1000.0;
