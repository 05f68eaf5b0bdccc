use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cluster::NodeId;

/// Version of a stored value: the coordinator's wall clock at write time
/// plus the id of the writing coordinator.
///
/// Field order matters: the derived `Ord` compares `timestamp_us` first and
/// breaks ties on `writer_id`, which is the cluster-wide total order on
/// writes. Two versions are equal only when both fields match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub timestamp_us: u64,
    pub writer_id: NodeId,
}

impl Version {
    pub fn new(timestamp_us: u64, writer_id: impl Into<NodeId>) -> Self {
        Self {
            timestamp_us,
            writer_id: writer_id.into(),
        }
    }

    /// Strictly-newer comparison. Irreflexive: a version is never newer
    /// than itself, so re-applying an equal version leaves a store entry
    /// untouched.
    pub fn is_newer_than(&self, other: &Version) -> bool {
        self > other
    }
}

/// A value at rest on one replica. Replaced wholesale on update, never
/// mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreEntry {
    pub value: String,
    pub version: Version,
}

/// Monotonic per-node counters. Increments and reads are relaxed; a
/// snapshot is an approximation with no cross-counter consistency.
#[derive(Debug, Default)]
pub struct NodeMetrics {
    reads: AtomicU64,
    writes: AtomicU64,
    read_repairs: AtomicU64,
    forward_failures: AtomicU64,
}

impl NodeMetrics {
    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read_repair(&self) {
        self.read_repairs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forward_failure(&self) {
        self.forward_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            read_repairs: self.read_repairs.load(Ordering::Relaxed),
            forward_failures: self.forward_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters, as served by the metrics endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub reads: u64,
    pub writes: u64,
    pub read_repairs: u64,
    pub forward_failures: u64,
}
