//! Node and Cluster Configuration
//!
//! A node is configured from two sources:
//! - command-line flags for identity and binding (`--id`, `--port`),
//! - a TOML cluster file for the replication policy and the seed members.
//!
//! ## Cluster file format
//! ```toml
//! replication_factor = 3
//! write_quorum = 1
//!
//! [[cluster.seeds]]
//! node_id = "n1"
//! address = "127.0.0.1:7001"
//!
//! [[cluster.seeds]]
//! node_id = "n2"
//! address = "127.0.0.1:7002"
//! ```
//! `replication_factor` and `write_quorum` fall back to 3 and 1 when
//! omitted. A node whose id is not listed in the seeds registers itself
//! under `localhost:<port>` at startup.

use std::path::Path;

use anyhow::{bail, Context, Result};
use figment::providers::{Format, Toml};
use figment::Figment;
use serde::Deserialize;

use crate::cluster::NodeId;

pub const DEFAULT_REPLICATION_FACTOR: usize = 3;
pub const DEFAULT_WRITE_QUORUM: usize = 1;

/// Settings of a single node process.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub node_id: NodeId,
    pub bind_addr: String,
    pub port: u16,
    /// RF: number of replicas per key.
    pub replication_factor: usize,
    /// W: replica acks needed for a PUT to report success.
    pub write_quorum: usize,
}

impl NodeConfig {
    /// Checks the replication policy and the node identity. Returns a short
    /// diagnostic on the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.replication_factor == 0 {
            bail!("replication_factor must be >= 1");
        }
        if self.write_quorum == 0 {
            bail!("write_quorum must be >= 1");
        }
        if self.write_quorum > self.replication_factor {
            bail!("write_quorum cannot exceed replication_factor");
        }
        if self.port == 0 {
            bail!("port must be > 0");
        }
        if self.node_id.as_str().is_empty() {
            bail!("node_id must not be empty");
        }
        Ok(())
    }
}

/// Contents of the cluster TOML file.
#[derive(Debug, Deserialize)]
pub struct ClusterFile {
    #[serde(default = "default_replication_factor")]
    pub replication_factor: usize,
    #[serde(default = "default_write_quorum")]
    pub write_quorum: usize,
    #[serde(default)]
    pub cluster: ClusterSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClusterSection {
    #[serde(default)]
    pub seeds: Vec<SeedNode>,
}

/// One statically configured cluster member.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedNode {
    pub node_id: String,
    pub address: String,
}

fn default_replication_factor() -> usize {
    DEFAULT_REPLICATION_FACTOR
}

fn default_write_quorum() -> usize {
    DEFAULT_WRITE_QUORUM
}

/// Loads the cluster file from disk.
pub fn load_cluster_file(path: &Path) -> Result<ClusterFile> {
    Figment::new()
        .merge(Toml::file_exact(path))
        .extract()
        .with_context(|| format!("failed to load cluster config from {}", path.display()))
}

/// Parses cluster-file TOML from a string.
pub fn parse_cluster_toml(raw: &str) -> Result<ClusterFile> {
    Figment::new()
        .merge(Toml::string(raw))
        .extract()
        .context("failed to parse cluster config")
}

#[cfg(test)]
mod tests;
