//! Cluster Membership Module
//!
//! Tracks which nodes belong to the cluster and where to reach them, and
//! keeps the placement ring in lockstep with that membership.
//!
//! ## Core Mechanisms
//! - **Static membership**: the view is populated from configuration at
//!   startup; `add`/`remove` exist for later adjustments but there is no
//!   discovery protocol.
//! - **Lockstep invariant**: the address map and the ring are updated under
//!   one mutex, so the set of ids in the map always equals the set of ids on
//!   the ring.

pub mod types;
pub mod view;

pub use types::NodeId;
pub use view::ClusterView;

#[cfg(test)]
mod tests;
