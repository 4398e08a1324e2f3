//! Router metrics for observability
//!
//! Counters describing how records moved through the router: how many
//! calls passed or failed the logger level gate, and how many sink
//! deliveries succeeded or failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery counters for a [`LoggingRouter`](crate::LoggingRouter)
///
/// # Example
///
/// ```
/// use rust_log_router::RouterMetrics;
///
/// let metrics = RouterMetrics::new();
/// metrics.record_emitted();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.records_emitted(), 1);
/// assert_eq!(metrics.deliveries(), 1);
/// ```
#[derive(Debug)]
pub struct RouterMetrics {
    /// Calls that passed the logger level gate
    records_emitted: AtomicU64,

    /// Calls stopped by the logger level gate
    records_suppressed: AtomicU64,

    /// Successful sink deliveries
    deliveries: AtomicU64,

    /// Sink deliveries that returned an error or panicked
    delivery_failures: AtomicU64,
}

impl RouterMetrics {
    pub const fn new() -> Self {
        Self {
            records_emitted: AtomicU64::new(0),
            records_suppressed: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_suppressed(&self) -> u64 {
        self.records_suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.records_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.records_suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.deliveries.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivery_failure(&self) -> u64 {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for RouterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = RouterMetrics::new();
        assert_eq!(metrics.records_emitted(), 0);
        assert_eq!(metrics.records_suppressed(), 0);
        assert_eq!(metrics.deliveries(), 0);
        assert_eq!(metrics.delivery_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous_count() {
        let metrics = RouterMetrics::new();
        assert_eq!(metrics.record_delivered(), 0);
        assert_eq!(metrics.record_delivered(), 1);
        metrics.record_delivery_failure();

        assert_eq!(metrics.deliveries(), 2);
        assert_eq!(metrics.delivery_failures(), 1);
    }
}
