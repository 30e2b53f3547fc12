//! Injectable wall clock
//!
//! The discovery cache ages by wall-clock time. Taking the clock as a
//! trait object lets tests drive TTL expiry deterministically instead of
//! sleeping through it.

/// Millisecond wall clock.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }
}
