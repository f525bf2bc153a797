//! Property-based tests for the resolver and profile round-trip.

use openhotas_mapping::prelude::*;
use openhotas_signal_map::{DeviceKind, SignalKey, SignalMap};
use proptest::prelude::*;
use std::collections::HashMap;

fn arb_axis_entry() -> impl Strategy<Value = MappingEntry> {
    (
        "[a-z][a-z0-9]{1,6}",
        prop_oneof![Just(DeviceKind::Stick), Just(DeviceKind::Throttle)],
        "[a-z]{1,5}",
        -20i32..20,
        0.0f32..0.5,
    )
        .prop_map(|(id, device, signal, priority, deadband)| {
            MappingEntry::new(
                id,
                SignalKey::new(device, signal),
                Action::Axis(AxisId::LX),
                priority,
                deadband,
            )
        })
}

proptest! {
    #[test]
    fn axis_winner_is_highest_priority_past_deadband(
        entries in proptest::collection::vec(arb_axis_entry(), 1..8),
        raw_values in proptest::collection::vec(-1.0f32..1.0, 8),
    ) {
        let mut resolver = MapResolver::new();
        resolver.set_entries(entries.clone());

        let mut values = HashMap::new();
        for (entry, v) in resolver.entries().iter().zip(raw_values.iter()) {
            values.insert(entry.signal_key.clone(), *v);
        }

        let result = resolver.resolve(&values).axis(AxisId::LX);

        // Recompute the law directly from the sorted order.
        let expected = resolver
            .entries()
            .iter()
            .map(|e| values.get(&e.signal_key).copied().unwrap_or(0.0))
            .zip(resolver.entries().iter())
            .find(|(v, e)| v.abs() > e.deadband)
            .map(|(v, _)| v)
            .unwrap_or_else(|| {
                resolver
                    .entries()
                    .iter()
                    .map(|e| values.get(&e.signal_key).copied().unwrap_or(0.0))
                    .fold(0.0f32, |acc, v| if v.abs() > acc.abs() { v } else { acc })
            });
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn profile_records_roundtrip_through_migration(
        entries in proptest::collection::vec(arb_axis_entry(), 0..8),
    ) {
        // Dedup ids: the table is keyed by id.
        let mut seen = std::collections::HashSet::new();
        let entries: Vec<MappingEntry> = entries
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();

        let map = SignalMap::builtin_default();
        let records: Vec<ProfileRecord> = entries.iter().map(ProfileRecord::from).collect();
        let outcome = migrate_records(records, &map);

        prop_assert_eq!(outcome.entries.len(), entries.len());
        for (a, b) in outcome.entries.iter().zip(entries.iter()) {
            prop_assert_eq!(a, b);
        }
    }
}
