//! Mapping profile persistence and legacy migration.
//!
//! Profiles are a JSON document `{ "mappings": [ ... ] }` of records
//! `{ id, signal_id, action, priority, deadband }`. Saving then loading a
//! profile reproduces the same entry set, order-independent.
//!
//! Legacy records may lack a device prefix on `signal_id`, a priority, or a
//! deadband. On load: an id that resolves to exactly one device in the
//! descriptor set is prefixed with that device; an ambiguous or unknown id is
//! left unmigrated (kept for re-save, inert at runtime) and warned about
//! once. Missing priority defaults to 0; missing deadband defaults to 0.05
//! for axis/trigger targets and 0.0 otherwise.

use crate::action::Action;
use crate::entry::{MappingEntry, DEFAULT_AXIS_DEADBAND};
use crate::{MappingError, MappingResult};
use openhotas_signal_map::{SignalKey, SignalMap};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// One persisted mapping record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileRecord {
    /// Unique mapping id.
    pub id: String,
    /// Signal id, device-prefixed (`stick:joy_x`) in current profiles.
    pub signal_id: String,
    /// Action string (`x360:left_x`, `keyboard:VK_SPACE`, `mouse:left_click`).
    pub action: String,
    /// Resolution priority.
    #[serde(default)]
    pub priority: i32,
    /// Deadband; absent in legacy profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadband: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileDocument {
    mappings: Vec<ProfileRecord>,
}

/// Result of loading a profile.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Entries ready for the mapping table.
    pub entries: Vec<MappingEntry>,
    /// Legacy records that could not be migrated; preserved for re-save.
    pub unmigrated: Vec<ProfileRecord>,
    /// Whether any record was rewritten during migration (worth re-saving).
    pub migrated: bool,
}

impl From<&MappingEntry> for ProfileRecord {
    fn from(entry: &MappingEntry) -> Self {
        Self {
            id: entry.id.clone(),
            signal_id: entry.signal_key.to_string(),
            action: entry.action.to_string(),
            priority: entry.priority,
            deadband: Some(entry.deadband),
        }
    }
}

/// Serialize entries (plus any carried unmigrated records) to a profile file.
///
/// # Errors
///
/// I/O and serialization failures.
pub fn save_profile(
    path: &Path,
    entries: &[MappingEntry],
    unmigrated: &[ProfileRecord],
) -> MappingResult<()> {
    let mut mappings: Vec<ProfileRecord> = entries.iter().map(ProfileRecord::from).collect();
    mappings.extend(unmigrated.iter().cloned());
    let doc = ProfileDocument { mappings };
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load and migrate a profile file.
///
/// # Errors
///
/// I/O and deserialization failures. Individual bad records do not fail the
/// load; they are skipped (malformed action) or carried unmigrated (legacy
/// signal id that cannot be resolved).
pub fn load_profile(path: &Path, map: &SignalMap) -> MappingResult<LoadOutcome> {
    let json = std::fs::read_to_string(path)?;
    let doc: ProfileDocument = serde_json::from_str(&json)?;
    Ok(migrate_records(doc.mappings, map))
}

/// Migrate parsed records into entries.
#[must_use]
pub fn migrate_records(records: Vec<ProfileRecord>, map: &SignalMap) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    for record in records {
        let action = match Action::parse(&record.action) {
            Ok(action) => action,
            Err(err) => {
                warn!(id = %record.id, action = %record.action, %err, "skipping mapping with unparseable action");
                continue;
            }
        };

        let signal_key = if record.signal_id.contains(':') {
            match SignalKey::parse(&record.signal_id) {
                Ok(key) => key,
                Err(err) => {
                    warn!(id = %record.id, signal = %record.signal_id, %err, "skipping mapping with bad signal id");
                    continue;
                }
            }
        } else {
            // Legacy record without a device prefix.
            match map.unique_device_for_id(&record.signal_id) {
                Some(device) => {
                    outcome.migrated = true;
                    SignalKey::new(device, record.signal_id.clone())
                }
                None => {
                    warn!(
                        id = %record.id,
                        signal = %record.signal_id,
                        "legacy mapping signal is ambiguous or unknown; left unmigrated"
                    );
                    outcome.unmigrated.push(record);
                    continue;
                }
            }
        };

        let deadband = match record.deadband {
            Some(db) => db,
            None => {
                outcome.migrated = true;
                if action.is_axis_like() {
                    DEFAULT_AXIS_DEADBAND
                } else {
                    0.0
                }
            }
        };

        outcome.entries.push(MappingEntry::new(
            record.id,
            signal_key,
            action,
            record.priority,
            deadband,
        ));
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{AxisId, ButtonId};
    use openhotas_signal_map::DeviceKind;
    use std::collections::BTreeSet;

    fn record(id: &str, signal: &str, action: &str) -> ProfileRecord {
        ProfileRecord {
            id: id.to_string(),
            signal_id: signal.to_string(),
            action: action.to_string(),
            priority: 0,
            deadband: Some(0.05),
        }
    }

    #[test]
    fn test_save_load_identity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mappings.json");
        let map = SignalMap::builtin_default();

        let entries = vec![
            MappingEntry::new(
                "m1",
                SignalKey::new(DeviceKind::Stick, "joy_x"),
                Action::Axis(AxisId::LX),
                10,
                0.05,
            ),
            MappingEntry::new(
                "m2",
                SignalKey::new(DeviceKind::Throttle, "e"),
                Action::Button(ButtonId::A),
                -3,
                0.0,
            ),
        ];

        save_profile(&path, &entries, &[]).expect("save");
        let outcome = load_profile(&path, &map).expect("load");

        let before: BTreeSet<String> = entries.iter().map(|e| format!("{e:?}")).collect();
        let after: BTreeSet<String> = outcome.entries.iter().map(|e| format!("{e:?}")).collect();
        assert_eq!(before, after);
        assert!(!outcome.migrated);
        assert!(outcome.unmigrated.is_empty());
    }

    #[test]
    fn test_legacy_unique_id_is_prefixed() {
        let map = SignalMap::builtin_default();
        let outcome = migrate_records(vec![record("m1", "joy_x", "x360:left_x")], &map);
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(
            outcome.entries[0].signal_key,
            SignalKey::new(DeviceKind::Stick, "joy_x")
        );
        assert!(outcome.migrated);
    }

    #[test]
    fn test_legacy_ambiguous_id_left_unmigrated() {
        let map = SignalMap::builtin_default();
        // "e" exists on both stick and throttle.
        let outcome = migrate_records(vec![record("m1", "e", "x360:button_a")], &map);
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.unmigrated.len(), 1);
        assert_eq!(outcome.unmigrated[0].signal_id, "e");
    }

    #[test]
    fn test_legacy_missing_deadband_defaults() {
        let map = SignalMap::builtin_default();
        let mut axis = record("m1", "stick:joy_x", "x360:left_x");
        axis.deadband = None;
        let mut button = record("m2", "stick:a", "x360:button_a");
        button.deadband = None;

        let outcome = migrate_records(vec![axis, button], &map);
        assert_eq!(outcome.entries[0].deadband, DEFAULT_AXIS_DEADBAND);
        assert_eq!(outcome.entries[1].deadband, 0.0);
        assert!(outcome.migrated);
    }

    #[test]
    fn test_bad_action_is_skipped() {
        let map = SignalMap::builtin_default();
        let outcome = migrate_records(vec![record("m1", "stick:joy_x", "x360:nope")], &map);
        assert!(outcome.entries.is_empty());
        assert!(outcome.unmigrated.is_empty());
    }

    #[test]
    fn test_unmigrated_records_survive_resave() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mappings.json");
        let map = SignalMap::builtin_default();

        let legacy = record("m1", "e", "x360:button_a");
        save_profile(&path, &[], &[legacy.clone()]).expect("save");
        let outcome = load_profile(&path, &map).expect("load");
        assert_eq!(outcome.unmigrated, vec![legacy]);
    }

    #[test]
    fn test_mapping_to_unknown_signal_is_retained() {
        // A well-formed key that matches no descriptor still loads; it just
        // resolves to 0 until the signal appears.
        let map = SignalMap::builtin_default();
        let outcome = migrate_records(vec![record("m1", "stick:mystery", "x360:left_x")], &map);
        assert_eq!(outcome.entries.len(), 1);
    }
}
