//! Integration tests: scheduler + clock + stats running as a real loop.

use openhotas_scheduler::prelude::*;
use std::time::Instant;

#[test]
fn loop_holds_target_rate() {
    let clock = TickClock::start();
    let mut sched = TickScheduler::new_1khz();
    let mut stats = LoopStats::new(clock.now_secs());
    let reader = stats.reader();

    // 300 ticks at 1 kHz is ~300 ms: long enough for two stats windows.
    for _ in 0..300 {
        let work_start = Instant::now();
        // Simulated tick work: nothing.
        let work_us = work_start.elapsed().as_secs_f64() * 1e6;
        stats.record(clock.now_secs(), work_us);
        sched.complete_tick().expect("tick");
    }

    let snap = reader.read();
    // Nominal is 1000 Hz; CI schedulers are noisy, so accept a wide band but
    // reject an order-of-magnitude miss.
    assert!(
        snap.effective_hz > 500.0 && snap.effective_hz < 1500.0,
        "effective rate out of band: {} Hz",
        snap.effective_hz
    );
    assert_eq!(sched.tick_count(), 300);
}

#[test]
fn priority_bump_is_best_effort() {
    // Refusal (no CAP_SYS_NICE) must be an error value, never a panic.
    match apply_thread_priority() {
        Ok(()) | Err(SchedulerError::PrioritySetupFailed) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}
