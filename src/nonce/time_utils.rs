//! Time utilities for tick computation.
//!
//! Ticks are coarse time buckets of `lifetime / 2` seconds. All arithmetic is
//! done in integers so odd lifetimes bucket exactly.

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds since Unix epoch.
///
/// A clock set before the epoch is treated as the epoch itself rather than
/// failing, since token creation has no failure mode.
pub(crate) fn current_timestamp() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs(),
        Err(_) => {
            tracing::warn!("System time is before Unix epoch, using 0");
            0
        }
    }
}

/// Computes `ceil(now / (lifetime / 2))`.
///
/// Rewritten as `ceil(2 * now / lifetime)` so the bucket width may be a
/// half-second without leaving integer arithmetic. `lifetime_secs` must be
/// non-zero; the engine builder guarantees it.
pub(crate) fn tick_at(now: u64, lifetime_secs: u64) -> i64 {
    debug_assert!(lifetime_secs > 0);
    let doubled = u128::from(now) * 2;
    let lifetime = u128::from(lifetime_secs.max(1));
    let tick = doubled.div_ceil(lifetime);
    i64::try_from(tick).unwrap_or(i64::MAX)
}

/// Earliest Unix second that falls into `tick`.
///
/// Inverse of [`tick_at`]: the smallest `now` with `tick_at(now) == tick`.
pub(crate) fn tick_start(tick: i64, lifetime_secs: u64) -> u64 {
    if tick <= 0 {
        return 0;
    }
    // tick_at(now) == tick  <=>  (tick - 1) * lifetime < 2 * now <= tick * lifetime
    let lower = (tick as u128 - 1) * u128::from(lifetime_secs);
    let start = lower / 2 + 1;
    u64::try_from(start).unwrap_or(u64::MAX)
}
