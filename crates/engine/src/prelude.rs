//! Prelude for the engine crate.

pub use crate::acquisition::{AcquisitionCore, Pipeline, PipelineHandle};
pub use crate::config::{RuntimeConfig, SignalModeConfig};
pub use crate::control::{ControlSurface, SharedControls};
pub use crate::error::{EngineError, TickFault};
pub use crate::publisher::{OutputState, Publisher};
pub use crate::status::{StatusBoard, Subsystem, SubsystemStatus};
pub use crate::store::SignalStore;
pub use crate::{DEFAULT_RING_CAPACITY, TARGET_HZ};
