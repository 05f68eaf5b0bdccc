use std::collections::HashMap;
use std::sync::Mutex;

use crate::cluster::NodeId;
use crate::ring::ConsistentHashRing;

/// Thread-safe view of cluster membership.
///
/// The address map and the placement ring are guarded by a single mutex and
/// updated together, so readers never observe a node that is in one but not
/// the other. Critical sections are map lookups and ring updates only; the
/// lock is never held across an RPC.
#[derive(Debug)]
pub struct ClusterView {
    inner: Mutex<ViewState>,
}

#[derive(Debug)]
struct ViewState {
    nodes: HashMap<NodeId, String>,
    ring: ConsistentHashRing,
}

impl ClusterView {
    /// Creates an empty view placing `vnodes` virtual nodes per member.
    pub fn new(vnodes: usize) -> Self {
        Self {
            inner: Mutex::new(ViewState {
                nodes: HashMap::new(),
                ring: ConsistentHashRing::new(vnodes),
            }),
        }
    }

    /// Registers a node. The first address registered for an id wins; a
    /// duplicate `add_node` is a no-op. Callers that need to change an
    /// address must remove the node and re-add it.
    pub fn add_node(&self, node_id: NodeId, address: impl Into<String>) {
        let mut state = self.lock();
        if state.nodes.contains_key(&node_id) {
            return;
        }
        state.ring.add_node(&node_id);
        state.nodes.insert(node_id, address.into());
    }

    /// Removes a node from the address map and the ring. No-op if absent.
    pub fn remove_node(&self, node_id: &NodeId) {
        let mut state = self.lock();
        if !state.nodes.contains_key(node_id) {
            return;
        }
        state.ring.remove_node(node_id);
        state.nodes.remove(node_id);
    }

    /// Transport address of `node_id`, if registered.
    pub fn address_of(&self, node_id: &NodeId) -> Option<String> {
        self.lock().nodes.get(node_id).cloned()
    }

    /// Ids of all registered nodes, in no particular order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.lock().nodes.keys().cloned().collect()
    }

    /// The node owning `key`, or `None` for an empty cluster.
    pub fn owner_for_key(&self, key: &str) -> Option<NodeId> {
        self.lock().ring.owner_node(key)
    }

    /// Ordered replica set for `key`, at most `replication_factor` long.
    pub fn replica_set(&self, key: &str, replication_factor: usize) -> Vec<NodeId> {
        self.lock().ring.preference_list(key, replication_factor)
    }

    pub fn len(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().nodes.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState> {
        // Every critical section is a map lookup or a map+ring update that
        // cannot leave the state half-written, so a poisoned lock is safe
        // to recover.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ClusterView {
    fn default() -> Self {
        Self::new(crate::ring::DEFAULT_VNODES)
    }
}
