//! Property-based tests for the sample ring.

use openhotas_atomic::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn snapshot_never_exceeds_capacity(pushes in 0usize..2000) {
        let ring = SampleRing::new(256);
        for i in 0..pushes {
            ring.push(i as f64 * 1e-3, i as f32);
        }
        let snap = ring.snapshot(pushes as f64 * 1e-3, f64::INFINITY);
        prop_assert!(snap.len() as u64 <= ring.capacity());
    }

    #[test]
    fn snapshot_times_are_monotone(pushes in 1usize..2000) {
        let ring = SampleRing::new(256);
        for i in 0..pushes {
            ring.push(i as f64 * 1e-3, i as f32);
        }
        let latest = (pushes - 1) as f64 * 1e-3;
        let snap = ring.snapshot(latest, f64::INFINITY);
        for pair in snap.windows(2) {
            prop_assert!(pair[0].t <= pair[1].t);
        }
    }

    #[test]
    fn snapshot_never_returns_future_samples(
        pushes in 1usize..500,
        window in 0.0f64..10.0,
    ) {
        let ring = SampleRing::new(512);
        for i in 0..pushes {
            ring.push(i as f64 * 1e-3, i as f32);
        }
        let latest = (pushes - 1) as f64 * 1e-3;
        for s in ring.snapshot(latest, window) {
            prop_assert!(s.t <= latest);
            prop_assert!(s.t >= latest - window);
        }
    }

    #[test]
    fn baseline_is_latest_sample_before_cutoff(gap in 1usize..100) {
        let ring = SampleRing::new(512);
        // A burst of old samples, then a quiet period, then one fresh sample.
        for i in 0..gap {
            ring.push(i as f64 * 1e-3, i as f32);
        }
        let fresh_t = 100.0;
        ring.push(fresh_t, -1.0);

        let snap = ring.snapshot_with_baseline(fresh_t, 1.0);
        prop_assert_eq!(snap[0].t, (gap - 1) as f64 * 1e-3);
        prop_assert_eq!(snap.last().map(|s| s.t), Some(fresh_t));
    }
}
