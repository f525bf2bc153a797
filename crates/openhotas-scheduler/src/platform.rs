//! Platform-specific sleep and thread-priority helpers.
//!
//! The scheduler sleeps coarsely to a point short of the deadline and
//! busy-spins the rest. On Linux the coarse sleep uses
//! `clock_nanosleep(CLOCK_MONOTONIC)`; elsewhere it falls back to
//! `std::thread::sleep`. Priority elevation is best-effort: the loop wants to
//! sit slightly above normal, and silently keeps running if the OS refuses.

use crate::error::{SchedulerError, SchedulerResult};
use std::time::Instant;

/// Raise the calling thread's priority slightly above normal.
///
/// On Linux this requests `SCHED_FIFO` at a low RT priority, which usually
/// needs `CAP_SYS_NICE`; refusal is reported but non-fatal. On other
/// platforms this is a no-op.
pub fn apply_thread_priority() -> SchedulerResult {
    imp::apply_thread_priority()
}

/// Coarse sleep until `target`.
///
/// May return early (the caller spins the remainder) but must not overshoot
/// by more than ordinary OS sleep slop.
pub fn coarse_sleep_until(target: Instant) -> SchedulerResult {
    imp::coarse_sleep_until(target)
}

#[cfg(target_os = "linux")]
mod imp {
    use super::*;

    pub fn apply_thread_priority() -> SchedulerResult {
        let param = libc::sched_param { sched_priority: 10 };
        // SAFETY: plain syscall on the current thread with a stack-local param.
        let rc = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
        if rc != 0 {
            return Err(SchedulerError::PrioritySetupFailed);
        }
        Ok(())
    }

    pub fn coarse_sleep_until(target: Instant) -> SchedulerResult {
        let now = Instant::now();
        if target <= now {
            return Ok(());
        }
        let remaining = target.duration_since(now);
        let ts = libc::timespec {
            tv_sec: remaining.as_secs() as libc::time_t,
            tv_nsec: remaining.subsec_nanos() as libc::c_long,
        };
        // SAFETY: relative sleep on the monotonic clock; ts is stack-local.
        let rc = unsafe {
            libc::clock_nanosleep(libc::CLOCK_MONOTONIC, 0, &ts, std::ptr::null_mut())
        };
        // EINTR is fine: the scheduler's spin tail absorbs an early wake.
        if rc != 0 && rc != libc::EINTR {
            return Err(SchedulerError::SleepFailed);
        }
        Ok(())
    }
}

#[cfg(not(target_os = "linux"))]
mod imp {
    use super::*;

    pub fn apply_thread_priority() -> SchedulerResult {
        Ok(())
    }

    pub fn coarse_sleep_until(target: Instant) -> SchedulerResult {
        let now = Instant::now();
        if target > now {
            std::thread::sleep(target - now);
        }
        Ok(())
    }
}
