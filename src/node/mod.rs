//! Node Module
//!
//! The per-node replication and reconciliation engine.
//!
//! ## Core Concepts
//! - **Coordination**: any node accepts client traffic. The coordinator
//!   computes the key's preference list from the cluster view, dispatches
//!   local and remote sub-operations, and aggregates the outcomes.
//! - **Write quorum**: a PUT fans out to RF replicas and reports success
//!   once at least W of them acknowledged; partial writes are left in place
//!   for later writes or read repair to reconcile.
//! - **Last-writer-wins**: every entry carries a `(timestamp, writer)`
//!   version; a replica only replaces its entry for a strictly newer one.
//! - **Read repair**: a GET collects every replica's entry, answers with the
//!   newest, and synchronously pushes that version to replicas that were
//!   missing it or held an older one.
//! - **Internal traffic**: peer-to-peer requests are flagged `is_internal`
//!   and operate strictly on the local store, which keeps replica fan-out
//!   from cascading across the cluster.

pub mod clients;
pub mod coordinator;
pub mod handlers;
pub mod protocol;
pub mod types;

pub use coordinator::Node;
pub use types::{MetricsSnapshot, StoreEntry, Version};
