//! Prelude for the HID common crate.

pub use crate::cell::{ReportCell, STALENESS_SECS};
pub use crate::mock::{MockDeviceHandle, MockDeviceSource};
pub use crate::source::{DeviceIdentity, DeviceSource, SourceHandle};
pub use crate::{HidSourceError, HidSourceResult};
