//! Metrics collection for token creation and verification.
//!
//! Collection is optional and enabled via the `metrics` feature. Attach a
//! collector with [`NonceEngineBuilder::with_metrics`](crate::NonceEngineBuilder::with_metrics).

use crate::Verification;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters tracked by the nonce engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonceMetrics {
    /// Total number of tokens created
    pub tokens_created: u64,
    /// Total number of verification attempts
    pub verification_attempts: u64,
    /// Verifications that matched the current tick
    pub fresh: u64,
    /// Verifications that matched the previous tick
    pub stale: u64,
    /// Verifications that matched neither tick
    pub invalid: u64,
    /// Average time per verification (microseconds)
    pub avg_verification_time_us: u64,
}

/// Events recorded by the engine.
#[derive(Debug, Clone)]
pub enum MetricEvent {
    /// A token was created
    TokenCreated {
        /// Time taken to derive
        duration: Duration,
    },
    /// A token was verified
    TokenVerified {
        /// Outcome of the verification
        outcome: Verification,
        /// Time taken to verify
        duration: Duration,
    },
}

/// Trait for metrics collection backends.
///
/// Methods are called inline on the create and verify paths and must not
/// block.
pub trait MetricsCollector: Send + Sync {
    /// Record a metric event.
    fn record_event(&self, event: MetricEvent);

    /// Get current metrics snapshot.
    fn get_metrics(&self) -> NonceMetrics;

    /// Reset all metrics to zero.
    fn reset_metrics(&self);
}

/// In-memory metrics collector backed by atomic counters.
///
/// # Example
///
/// ```rust
/// use action_nonce::metrics::{InMemoryMetricsCollector, MetricEvent, MetricsCollector};
/// use std::time::Duration;
///
/// let collector = InMemoryMetricsCollector::new();
/// collector.record_event(MetricEvent::TokenCreated {
///     duration: Duration::from_micros(12),
/// });
/// assert_eq!(collector.get_metrics().tokens_created, 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMetricsCollector {
    tokens_created: AtomicU64,
    verification_attempts: AtomicU64,
    fresh: AtomicU64,
    stale: AtomicU64,
    invalid: AtomicU64,
    verification_time_total: AtomicU64,
}

impl InMemoryMetricsCollector {
    /// Create a new in-memory metrics collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsCollector for InMemoryMetricsCollector {
    fn record_event(&self, event: MetricEvent) {
        match event {
            MetricEvent::TokenCreated { .. } => {
                self.tokens_created.fetch_add(1, Ordering::Relaxed);
            }
            MetricEvent::TokenVerified { outcome, duration } => {
                self.verification_attempts.fetch_add(1, Ordering::Relaxed);
                let counter = match outcome {
                    Verification::Fresh => &self.fresh,
                    Verification::Stale => &self.stale,
                    Verification::Invalid => &self.invalid,
                };
                counter.fetch_add(1, Ordering::Relaxed);
                self.verification_time_total
                    .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
            }
        }
    }

    fn get_metrics(&self) -> NonceMetrics {
        let attempts = self.verification_attempts.load(Ordering::Relaxed);
        NonceMetrics {
            tokens_created: self.tokens_created.load(Ordering::Relaxed),
            verification_attempts: attempts,
            fresh: self.fresh.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            avg_verification_time_us: if attempts > 0 {
                self.verification_time_total.load(Ordering::Relaxed) / attempts
            } else {
                0
            },
        }
    }

    fn reset_metrics(&self) {
        self.tokens_created.store(0, Ordering::Relaxed);
        self.verification_attempts.store(0, Ordering::Relaxed);
        self.fresh.store(0, Ordering::Relaxed);
        self.stale.store(0, Ordering::Relaxed);
        self.invalid.store(0, Ordering::Relaxed);
        self.verification_time_total.store(0, Ordering::Relaxed);
    }
}

/// Collector that discards all metrics.
#[derive(Debug, Default)]
pub struct NoOpMetricsCollector;

impl NoOpMetricsCollector {
    /// Create a new no-op metrics collector.
    pub fn new() -> Self {
        Self
    }
}

impl MetricsCollector for NoOpMetricsCollector {
    fn record_event(&self, _event: MetricEvent) {}

    fn get_metrics(&self) -> NonceMetrics {
        NonceMetrics::default()
    }

    fn reset_metrics(&self) {}
}

/// Measures the time between creation and [`MetricsTimer::elapsed`].
#[derive(Debug)]
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
