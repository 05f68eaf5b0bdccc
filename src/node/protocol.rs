//! Node Network Protocol
//!
//! Endpoints and Data Transfer Objects for both client and internode
//! traffic. Requests are serialized as JSON and sent over HTTP POST; the
//! `is_internal` flag on a request discriminates peer traffic (which
//! operates on the local store only) from client traffic (which runs the
//! coordinator).
//!
//! Handlers always answer HTTP 200 with the outcome in the body, so a
//! missing key stays distinguishable from a transport failure.

use serde::{Deserialize, Serialize};

use super::types::{StoreEntry, Version};

// --- API Endpoints ---

/// Write endpoint, client and peer traffic alike.
pub const ENDPOINT_PUT: &str = "/put";
/// Read endpoint, client and peer traffic alike.
pub const ENDPOINT_GET: &str = "/get";
/// Counter snapshot for dashboards and tests.
pub const ENDPOINT_METRICS: &str = "/metrics";

// --- Data Transfer Objects ---

/// Write request.
///
/// Client writes leave `version` unset; the coordinator mints one. Peer
/// writes (`is_internal = true`) must carry the version minted by the
/// coordinating node, and it is applied verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub version: Option<Version>,
}

/// Write acknowledgment. For client writes `success` means the write
/// quorum was met; for peer writes it means the local apply was accounted
/// for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutResponse {
    pub success: bool,
}

/// Read request. Peer reads (`is_internal = true`) return exactly the local
/// entry with no coordination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRequest {
    pub key: String,
    #[serde(default)]
    pub is_internal: bool,
}

/// Read response. `version` is present iff `found` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub found: bool,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub version: Option<Version>,
}

impl GetResponse {
    pub fn from_entry(entry: Option<StoreEntry>) -> Self {
        match entry {
            Some(entry) => Self {
                found: true,
                value: entry.value,
                version: Some(entry.version),
            },
            None => Self {
                found: false,
                value: String::new(),
                version: None,
            },
        }
    }

    /// Recovers the store entry carried by this response, if any.
    pub fn into_entry(self) -> Option<StoreEntry> {
        if !self.found {
            return None;
        }
        self.version.map(|version| StoreEntry {
            value: self.value,
            version,
        })
    }
}
