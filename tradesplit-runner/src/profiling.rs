//! Timing instrumentation for breakdown runs.
//!
//! Scopes always measure; they only report when profiling is enabled.
//!
//! # Usage
//!
//! ```
//! use tradesplit_runner::profiling::ProfileScope;
//!
//! fn expensive_operation() {
//!     let _scope = ProfileScope::new("expensive_operation");
//!     // Work happens here...
//!     // Timing logged on drop
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `TRADESPLIT_PROFILE=1` - Report scope timings through `tracing`

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Global flag to enable/disable profiling.
static PROFILING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Global counter for total profiled operations.
static TOTAL_OPERATIONS: AtomicU64 = AtomicU64::new(0);

/// Read `TRADESPLIT_PROFILE` and set the profiling flag.
///
/// Should be called once at program startup.
pub fn init() {
    let enabled = std::env::var("TRADESPLIT_PROFILE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    set_enabled(enabled);
    if enabled {
        tracing::info!("profiling enabled (TRADESPLIT_PROFILE=1)");
    }
}

pub fn set_enabled(enabled: bool) {
    PROFILING_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn is_enabled() -> bool {
    PROFILING_ENABLED.load(Ordering::Relaxed)
}

/// A profiling scope that measures execution time; reports on drop.
pub struct ProfileScope {
    name: &'static str,
    start: Instant,
}

impl ProfileScope {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        TOTAL_OPERATIONS.fetch_add(1, Ordering::Relaxed);
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        report(self.name, self.start.elapsed());
    }
}

/// Run `f` and return its result along with how long it took.
pub fn profile<F, R>(name: &'static str, f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    TOTAL_OPERATIONS.fetch_add(1, Ordering::Relaxed);
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();
    report(name, duration);
    (result, duration)
}

fn report(name: &'static str, duration: Duration) {
    if is_enabled() {
        tracing::info!(
            scope = name,
            elapsed_ms = duration.as_secs_f64() * 1000.0,
            "profile"
        );
    }
}

/// Total number of profiled scopes since start.
pub fn total_operations() -> u64 {
    TOTAL_OPERATIONS.load(Ordering::Relaxed)
}
