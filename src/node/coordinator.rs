//! Per-node state and the request coordinator.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::cluster::{ClusterView, NodeId};
use crate::config::NodeConfig;

use super::clients::ReplicaClients;
use super::protocol::{GetRequest, PutRequest};
use super::types::{MetricsSnapshot, NodeMetrics, StoreEntry, Version};

/// One cluster node: the local key-value store plus the coordinator that
/// fans client requests out to the key's replica set.
///
/// The node borrows the cluster view (shared with the process that
/// maintains membership) and owns everything else. All methods take
/// `&self`; the store is a concurrent map whose per-key entry API serializes
/// updates to the same key, and no lock is ever held across a peer call.
pub struct Node {
    config: NodeConfig,
    cluster: Arc<ClusterView>,
    store: DashMap<String, StoreEntry>,
    replicas: ReplicaClients,
    metrics: NodeMetrics,
}

impl Node {
    pub fn new(config: NodeConfig, cluster: Arc<ClusterView>) -> Self {
        let replicas = ReplicaClients::new(cluster.clone());
        Self {
            config,
            cluster,
            store: DashMap::new(),
            replicas,
            metrics: NodeMetrics::default(),
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.config.node_id
    }

    pub fn replication_factor(&self) -> usize {
        self.config.replication_factor
    }

    pub fn write_quorum(&self) -> usize {
        self.config.write_quorum
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Coordinates a client write.
    ///
    /// Mints a version from the local wall clock, fans the write out to the
    /// key's replica set in preference-list order, and reports success iff
    /// at least `write_quorum` replicas acknowledged. Every sub-operation
    /// completes before the outcome is computed; failed forwards leave
    /// partial writes in place for read repair to reconcile later.
    pub async fn put(&self, key: &str, value: &str) -> bool {
        // Counts attempts, not successes, so it fires before any routing.
        self.metrics.record_write();

        let version = Version {
            timestamp_us: now_us(),
            writer_id: self.config.node_id.clone(),
        };

        let replicas = self.cluster.replica_set(key, self.config.replication_factor);
        if replicas.is_empty() {
            tracing::warn!(key, "put with no replicas available");
            return false;
        }

        let mut acks = 0usize;
        for replica in &replicas {
            let acked = if replica == self.node_id() {
                self.apply_put_local(key, value, version.clone())
            } else {
                self.forward_put(replica, key, value, &version).await
            };
            if acked {
                acks += 1;
            }
        }

        tracing::debug!(
            key,
            acks,
            quorum = self.config.write_quorum,
            "put fan-out complete"
        );
        acks >= self.config.write_quorum
    }

    /// Coordinates a client read.
    ///
    /// Collects the entry held by every replica in the key's preference
    /// list, answers with the newest version observed, and synchronously
    /// repairs replicas that returned nothing or something strictly older.
    /// A replica that cannot be reached reads as missing; a failed repair
    /// leaves the divergence for the next read to notice.
    pub async fn get(&self, key: &str) -> Option<StoreEntry> {
        self.metrics.record_read();

        let replicas = self.cluster.replica_set(key, self.config.replication_factor);
        if replicas.is_empty() {
            tracing::warn!(key, "get with no replicas available");
            return None;
        }

        let mut results: Vec<(NodeId, Option<StoreEntry>)> = Vec::with_capacity(replicas.len());
        for replica in replicas {
            let entry = if &replica == self.node_id() {
                self.local_get(key)
            } else {
                self.forward_get(&replica, key).await
            };
            results.push((replica, entry));
        }

        let best = results
            .iter()
            .filter_map(|(_, entry)| entry.as_ref())
            .max_by(|a, b| a.version.cmp(&b.version))?
            .clone();

        for (replica, entry) in &results {
            let lagging = match entry {
                None => true,
                Some(entry) => entry.version < best.version,
            };
            if !lagging {
                continue;
            }

            self.metrics.record_read_repair();
            tracing::debug!(key, replica = %replica, "read repair");
            if replica == self.node_id() {
                self.apply_put_local(key, &best.value, best.version.clone());
            } else {
                let _ = self.forward_put(replica, key, &best.value, &best.version).await;
            }
        }

        Some(best)
    }

    /// Reads the local replica only. No coordination, no repair.
    pub fn local_get(&self, key: &str) -> Option<StoreEntry> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    /// Applies a versioned write to the local store under last-writer-wins:
    /// insert when the key is absent, replace only for a strictly newer
    /// version, ignore otherwise.
    ///
    /// Returns true in every case. The return value reports that the write
    /// was accounted for, not that it replaced the entry; a stale or
    /// equal-version write is deliberately indistinguishable from an
    /// overwrite.
    pub fn apply_put_local(&self, key: &str, value: &str, version: Version) -> bool {
        match self.store.entry(key.to_string()) {
            Entry::Occupied(mut current) => {
                if version.is_newer_than(&current.get().version) {
                    current.insert(StoreEntry {
                        value: value.to_string(),
                        version,
                    });
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(StoreEntry {
                    value: value.to_string(),
                    version,
                });
            }
        }
        true
    }

    /// Sends an internal PUT to one replica. Any failure (unknown node,
    /// transport error, deadline, peer-reported rejection) counts one
    /// forward failure and returns false; it never aborts the request that
    /// triggered it.
    pub async fn forward_put(
        &self,
        owner_id: &NodeId,
        key: &str,
        value: &str,
        version: &Version,
    ) -> bool {
        let Some(client) = self.replicas.client_for(owner_id) else {
            self.metrics.record_forward_failure();
            tracing::debug!(node = %owner_id, "forward put: unknown replica");
            return false;
        };

        let request = PutRequest {
            key: key.to_string(),
            value: value.to_string(),
            is_internal: true,
            version: Some(version.clone()),
        };

        match client.put(&request).await {
            Ok(response) if response.success => true,
            Ok(_) => {
                self.metrics.record_forward_failure();
                tracing::debug!(node = %owner_id, key, "forward put rejected by replica");
                false
            }
            Err(error) => {
                self.metrics.record_forward_failure();
                tracing::debug!(node = %owner_id, key, %error, "forward put failed");
                false
            }
        }
    }

    /// Reads one replica via an internal GET. Failures count one forward
    /// failure and read as "no entry".
    pub async fn forward_get(&self, owner_id: &NodeId, key: &str) -> Option<StoreEntry> {
        let Some(client) = self.replicas.client_for(owner_id) else {
            self.metrics.record_forward_failure();
            tracing::debug!(node = %owner_id, "forward get: unknown replica");
            return None;
        };

        let request = GetRequest {
            key: key.to_string(),
            is_internal: true,
        };

        match client.get(&request).await {
            Ok(response) => response.into_entry(),
            Err(error) => {
                self.metrics.record_forward_failure();
                tracing::debug!(node = %owner_id, key, %error, "forward get failed");
                None
            }
        }
    }
}

/// Wall-clock microseconds since the Unix epoch, as minted into versions.
fn now_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}
