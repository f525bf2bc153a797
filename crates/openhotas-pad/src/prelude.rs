//! Prelude for the pad crate.

pub use crate::mock::{KeyEvent, MockSyntheticInput, MockVirtualPad, MouseEvent};
pub use crate::report::{axis_to_wire, trigger_to_wire, PadReport};
pub use crate::scan::scan_code_for_vk;
pub use crate::synthetic::{KeyRepeatTiming, SyntheticInput};
pub use crate::virtual_pad::VirtualPad;
pub use crate::{PadError, PadResult};
