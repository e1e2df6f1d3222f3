// Editor metrics
//
// Lock-free counters for the editor's hot paths and backend traffic

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Session metrics.
///
/// Counters use relaxed atomics; they are diagnostics, not synchronization.
#[derive(Debug)]
pub struct Metrics {
    /// State updates applied through the state manager
    pub state_updates: AtomicU64,

    /// Full preview projections (every update re-projects all surfaces)
    pub projections: AtomicU64,

    /// Collection resyncs
    pub resyncs: AtomicU64,

    /// Enhancement requests actually sent to the backend
    pub enhancement_requests: AtomicU64,

    /// Enhancement attempts rejected before any request was sent
    pub enhancement_rejections: AtomicU64,

    /// Generation requests sent to the backend
    pub generation_requests: AtomicU64,

    /// Notifications shown to the user
    pub notifications: AtomicU64,

    /// Broadcasts that found no subscriber
    pub unobserved_broadcasts: AtomicU64,

    /// Total backend round-trip time in milliseconds
    pub backend_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            state_updates: AtomicU64::new(0),
            projections: AtomicU64::new(0),
            resyncs: AtomicU64::new(0),
            enhancement_requests: AtomicU64::new(0),
            enhancement_rejections: AtomicU64::new(0),
            generation_requests: AtomicU64::new(0),
            notifications: AtomicU64::new(0),
            unobserved_broadcasts: AtomicU64::new(0),
            backend_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_state_update(&self) {
        self.state_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_projection(&self) {
        self.projections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resync(&self) {
        self.resyncs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enhancement_request(&self) {
        self.enhancement_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enhancement_rejection(&self) {
        self.enhancement_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation_request(&self) {
        self.generation_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification(&self) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unobserved_broadcast(&self) {
        self.unobserved_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backend_time(&self, duration: Duration) {
        self.backend_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average backend round trip in milliseconds over every request sent.
    pub fn avg_backend_time_ms(&self) -> f64 {
        let total = self.backend_time_ms.load(Ordering::Relaxed);
        let count = self.enhancement_requests.load(Ordering::Relaxed)
            + self.generation_requests.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Editor Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "State updates: {}, projections: {}, resyncs: {}",
            self.state_updates.load(Ordering::Relaxed),
            self.projections.load(Ordering::Relaxed),
            self.resyncs.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Enhancements: {} sent, {} rejected; generations: {}; avg backend time {:.1}ms",
            self.enhancement_requests.load(Ordering::Relaxed),
            self.enhancement_rejections.load(Ordering::Relaxed),
            self.generation_requests.load(Ordering::Relaxed),
            self.avg_backend_time_ms()
        );
        tracing::info!(
            "Notifications: {}, unobserved broadcasts: {}",
            self.notifications.load(Ordering::Relaxed),
            self.unobserved_broadcasts.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
