//! Metrics registry
//!
//! - Counters only, monotonic, reset only on process start
//! - Thread-safe without locks: one registry can be shared by every
//!   thread validating against the same schema

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Validation counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Documents validated
    documents_validated: AtomicU64,
    /// Documents that produced no errors
    documents_clean: AtomicU64,
    /// Fields written to an output document
    fields_accepted: AtomicU64,
    /// Validation errors emitted
    fields_rejected: AtomicU64,
    /// Defaults written for absent fields
    defaults_applied: AtomicU64,
    /// Output writes that failed
    engine_faults: AtomicU64,
    /// Requests rejected before validation
    requests_rejected: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_documents_validated(&self) {
        self.documents_validated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_documents_clean(&self) {
        self.documents_clean.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_fields_accepted(&self, count: u64) {
        self.fields_accepted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_fields_rejected(&self, count: u64) {
        self.fields_rejected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_defaults_applied(&self, count: u64) {
        self.defaults_applied.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_engine_faults(&self, count: u64) {
        self.engine_faults.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_requests_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_validated: self.documents_validated.load(Ordering::Relaxed),
            documents_clean: self.documents_clean.load(Ordering::Relaxed),
            fields_accepted: self.fields_accepted.load(Ordering::Relaxed),
            fields_rejected: self.fields_rejected.load(Ordering::Relaxed),
            defaults_applied: self.defaults_applied.load(Ordering::Relaxed),
            engine_faults: self.engine_faults.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub documents_validated: u64,
    pub documents_clean: u64,
    pub fields_accepted: u64,
    pub fields_rejected: u64,
    pub defaults_applied: u64,
    pub engine_faults: u64,
    pub requests_rejected: u64,
}

impl MetricsSnapshot {
    /// Returns the counters as `(name, value)` log fields
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("documents_validated", self.documents_validated.to_string()),
            ("documents_clean", self.documents_clean.to_string()),
            ("fields_accepted", self.fields_accepted.to_string()),
            ("fields_rejected", self.fields_rejected.to_string()),
            ("defaults_applied", self.defaults_applied.to_string()),
            ("engine_faults", self.engine_faults.to_string()),
            ("requests_rejected", self.requests_rejected.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.documents_validated, 0);
        assert_eq!(snapshot.fields_rejected, 0);
        assert_eq!(snapshot.engine_faults, 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();
        registry.increment_documents_validated();
        registry.increment_documents_validated();
        registry.increment_documents_clean();
        registry.add_fields_accepted(5);
        registry.add_fields_rejected(2);
        registry.add_defaults_applied(1);
        registry.increment_requests_rejected();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.documents_validated, 2);
        assert_eq!(snapshot.documents_clean, 1);
        assert_eq!(snapshot.fields_accepted, 5);
        assert_eq!(snapshot.fields_rejected, 2);
        assert_eq!(snapshot.defaults_applied, 1);
        assert_eq!(snapshot.requests_rejected, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.add_fields_accepted(3);

        let parsed = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(parsed["fields_accepted"], 3);
        assert_eq!(parsed["engine_faults"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_documents_validated();
                    reg.add_fields_rejected(2);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.documents_validated, 1000);
        assert_eq!(snapshot.fields_rejected, 2000);
    }
}
