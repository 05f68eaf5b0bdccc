//! Consistent-Hash Placement Ring
//!
//! Maps keys to nodes with minimal disruption when membership changes.
//!
//! ## Mechanism
//! - **Virtual nodes**: every member is inserted at `V` positions
//!   (`hash(id + "#" + i)` for `i` in `0..V`), which evens out the load
//!   across members.
//! - **Ownership**: a key belongs to the first ring position at or after its
//!   hash, wrapping around at the top of the hash space.
//! - **Preference list**: the ordered replica set for a key is found by
//!   walking the ring forward from the owner, collecting distinct node ids.
//!
//! The ring is not internally synchronized; [`ClusterView`] always accesses
//! it under its own mutex.
//!
//! [`ClusterView`]: crate::cluster::ClusterView

use std::collections::{BTreeMap, HashSet};

use crate::cluster::NodeId;
use crate::hash::{murmur3_64_str, PLACEMENT_SEED};

/// Default virtual-node multiplier.
pub const DEFAULT_VNODES: usize = 100;

/// Ordered ring of virtual-node positions.
#[derive(Debug)]
pub struct ConsistentHashRing {
    vnodes: usize,
    ring: BTreeMap<u64, NodeId>,
}

impl ConsistentHashRing {
    /// Creates an empty ring placing `vnodes` virtual nodes per member.
    pub fn new(vnodes: usize) -> Self {
        Self {
            vnodes,
            ring: BTreeMap::new(),
        }
    }

    /// Inserts `vnodes` positions for `node_id`.
    ///
    /// A hash collision between two distinct `(id, i)` pairs simply
    /// overwrites; `remove_node` removes by value equality so no entry is
    /// orphaned either way.
    pub fn add_node(&mut self, node_id: &NodeId) {
        for i in 0..self.vnodes {
            let h = self.hash(&format!("{}#{}", node_id, i));
            self.ring.insert(h, node_id.clone());
        }
    }

    /// Removes every position owned by `node_id`. No-op for absent nodes.
    pub fn remove_node(&mut self, node_id: &NodeId) {
        self.ring.retain(|_, id| id != node_id);
    }

    /// The node owning `key`, or `None` if the ring is empty.
    pub fn owner_node(&self, key: &str) -> Option<NodeId> {
        if self.ring.is_empty() {
            return None;
        }
        let h = self.hash(key);
        self.ring
            .range(h..)
            .next()
            .or_else(|| self.ring.iter().next()) // wrap around
            .map(|(_, id)| id.clone())
    }

    /// The ordered replica set for `key`: up to `num_replicas` distinct node
    /// ids, starting at the owner and walking the ring forward with
    /// wrap-around. Shorter than `num_replicas` when the ring holds fewer
    /// distinct nodes.
    pub fn preference_list(&self, key: &str, num_replicas: usize) -> Vec<NodeId> {
        let mut result = Vec::new();
        if self.ring.is_empty() || num_replicas == 0 {
            return result;
        }

        let h = self.hash(key);
        let mut seen = HashSet::new();

        // range(h..) then range(..h) is one full revolution from the owner.
        for (_, node_id) in self.ring.range(h..).chain(self.ring.range(..h)) {
            if seen.insert(node_id.clone()) {
                result.push(node_id.clone());
                if result.len() == num_replicas {
                    break;
                }
            }
        }

        result
    }

    /// Number of virtual-node positions currently on the ring.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    fn hash(&self, key: &str) -> u64 {
        murmur3_64_str(key, PLACEMENT_SEED)
    }
}

impl Default for ConsistentHashRing {
    fn default() -> Self {
        Self::new(DEFAULT_VNODES)
    }
}
