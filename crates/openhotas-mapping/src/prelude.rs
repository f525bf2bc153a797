//! Prelude for the mapping crate.

pub use crate::action::{Action, AxisId, ButtonId, MouseOp, MouseOpKind, VirtualKey};
pub use crate::entry::{MappingEntry, DEFAULT_AXIS_DEADBAND};
pub use crate::profile::{load_profile, migrate_records, save_profile, LoadOutcome, ProfileRecord};
pub use crate::resolver::{MapResolver, ResolvedOutputs};
pub use crate::table::MappingTable;
pub use crate::{MappingError, MappingResult};
