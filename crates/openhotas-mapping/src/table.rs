//! The mutex-protected mapping table.

use crate::entry::MappingEntry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// In-memory set of mapping entries, keyed by unique id.
///
/// Edits are rare relative to resolver reads, so readers copy a snapshot out
/// under a short lock; the publisher tick never holds the lock while
/// resolving. A generation counter bumps on every edit so the resolver can
/// skip re-copying an unchanged table.
///
/// Adding an entry whose id already exists replaces the existing entry
/// (upsert semantics).
#[derive(Debug, Default)]
pub struct MappingTable {
    inner: Mutex<Vec<MappingEntry>>,
    generation: AtomicU64,
}

impl MappingTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id. Returns `true` when an existing entry was
    /// replaced.
    pub fn add(&self, entry: MappingEntry) -> bool {
        let replaced = {
            let mut entries = self.lock();
            if let Some(existing) = entries.iter_mut().find(|e| e.id == entry.id) {
                *existing = entry;
                true
            } else {
                entries.push(entry);
                false
            }
        };
        self.bump();
        replaced
    }

    /// Remove by id. Returns `true` when an entry was removed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = {
            let mut entries = self.lock();
            let before = entries.len();
            entries.retain(|e| e.id != id);
            entries.len() != before
        };
        if removed {
            self.bump();
        }
        removed
    }

    /// Copy the current entries out.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MappingEntry> {
        self.lock().clone()
    }

    /// Replace the whole table (profile load).
    pub fn replace_all(&self, entries: Vec<MappingEntry>) {
        *self.lock() = entries;
        self.bump();
    }

    /// Edit generation; changes whenever the entry set changes.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MappingEntry>> {
        // A poisoned table would only mean a panicking writer mid-edit; the
        // entry list itself is always a valid snapshot.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, AxisId, ButtonId};
    use openhotas_signal_map::{DeviceKind, SignalKey};

    fn entry(id: &str, action: Action) -> MappingEntry {
        MappingEntry::new(
            id,
            SignalKey::new(DeviceKind::Stick, "joy_x"),
            action,
            0,
            0.05,
        )
    }

    #[test]
    fn test_add_and_snapshot() {
        let table = MappingTable::new();
        assert!(!table.add(entry("m1", Action::Axis(AxisId::LX))));
        assert!(!table.add(entry("m2", Action::Button(ButtonId::A))));
        assert_eq!(table.len(), 2);
        assert_eq!(table.snapshot().len(), 2);
    }

    #[test]
    fn test_add_is_upsert() {
        let table = MappingTable::new();
        table.add(entry("m1", Action::Axis(AxisId::LX)));
        assert!(table.add(entry("m1", Action::Axis(AxisId::RX))));
        assert_eq!(table.len(), 1);
        assert_eq!(table.snapshot()[0].action, Action::Axis(AxisId::RX));
    }

    #[test]
    fn test_remove() {
        let table = MappingTable::new();
        table.add(entry("m1", Action::Axis(AxisId::LX)));
        assert!(table.remove("m1"));
        assert!(!table.remove("m1"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_generation_bumps_on_edits() {
        let table = MappingTable::new();
        let g0 = table.generation();
        table.add(entry("m1", Action::Axis(AxisId::LX)));
        let g1 = table.generation();
        assert_ne!(g0, g1);
        table.remove("m1");
        assert_ne!(table.generation(), g1);
        // Removing a missing id changes nothing.
        let g2 = table.generation();
        table.remove("m1");
        assert_eq!(table.generation(), g2);
    }

    #[test]
    fn test_replace_all() {
        let table = MappingTable::new();
        table.add(entry("m1", Action::Axis(AxisId::LX)));
        table.replace_all(vec![entry("n1", Action::Button(ButtonId::B))]);
        let snap = table.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, "n1");
    }
}
