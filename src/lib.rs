//! Distributed Key-Value Store Library
//!
//! This library crate defines the core modules of the cluster. It serves as
//! the foundation for the node binary (`main.rs`) and the client binary
//! (`bin/kv_cli.rs`).
//!
//! ## Architecture Modules
//! The system is composed of six loosely coupled subsystems:
//!
//! - **`hash`**: Deterministic 64-bit hashing used for key and virtual-node
//!   placement. Every node in a deployment must agree on it.
//! - **`ring`**: The consistent-hash placement ring. Maps keys to an owner
//!   node and to an ordered preference list of replicas.
//! - **`cluster`**: The thread-safe membership view (node id to address),
//!   maintained in lockstep with the ring.
//! - **`config`**: Node settings, cluster file loading and validation.
//! - **`logging`**: Log-level parsing and subscriber initialization.
//! - **`node`**: The per-node state and coordinator. Fans writes out to
//!   replicas under a write-quorum policy, reconciles divergent replicas by
//!   last-writer-wins on read, and exposes the HTTP handlers that
//!   demultiplex client traffic from peer traffic.

pub mod cluster;
pub mod config;
pub mod hash;
pub mod logging;
pub mod node;
pub mod ring;
