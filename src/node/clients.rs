//! Outbound Replica Clients
//!
//! Pooled HTTP clients for peer nodes, keyed by node id. Handles are
//! created lazily on first use and kept for the process lifetime; a failed
//! call is reported to the caller but never evicts the handle, since the
//! underlying connection pool reconnects on its own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{bail, Result};

use crate::cluster::{ClusterView, NodeId};

use super::protocol::{GetRequest, GetResponse, PutRequest, PutResponse, ENDPOINT_GET, ENDPOINT_PUT};

/// Deadline applied to every internal peer call. Expiry is reported as a
/// plain failure; the coordinator folds it into its quorum accounting.
pub const REPLICA_CALL_TIMEOUT: Duration = Duration::from_millis(50);

/// Outbound handle to one peer: a dedicated HTTP client plus the peer's
/// base URL. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ReplicaClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReplicaClient {
    fn connect(address: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REPLICA_CALL_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: format!("http://{}", address),
        })
    }

    /// Sends an internal PUT. Transport failure, deadline expiry and
    /// non-success HTTP statuses all surface as errors.
    pub async fn put(&self, request: &PutRequest) -> Result<PutResponse> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_PUT))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("put to {} failed: {}", self.base_url, response.status());
        }
        Ok(response.json().await?)
    }

    /// Sends an internal GET.
    pub async fn get(&self, request: &GetRequest) -> Result<GetResponse> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_GET))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("get from {} failed: {}", self.base_url, response.status());
        }
        Ok(response.json().await?)
    }
}

/// Lazily populated cache of [`ReplicaClient`] handles.
#[derive(Debug)]
pub struct ReplicaClients {
    cluster: Arc<ClusterView>,
    clients: Mutex<HashMap<NodeId, ReplicaClient>>,
}

impl ReplicaClients {
    pub fn new(cluster: Arc<ClusterView>) -> Self {
        Self {
            cluster,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Handle for `node_id`, or `None` when the cluster view does not know
    /// the node.
    ///
    /// Double-checked creation: probe under the lock, build the client with
    /// the lock released (construction may touch the resolver), then
    /// re-probe and insert. When two callers race, the first inserted
    /// handle wins and the loser's client is dropped.
    pub fn client_for(&self, node_id: &NodeId) -> Option<ReplicaClient> {
        if let Some(client) = self.lock().get(node_id) {
            return Some(client.clone());
        }

        let address = self.cluster.address_of(node_id)?;
        let built = match ReplicaClient::connect(&address) {
            Ok(client) => client,
            Err(error) => {
                tracing::error!(node = %node_id, %error, "failed to build replica client");
                return None;
            }
        };

        let mut clients = self.lock();
        Some(clients.entry(node_id.clone()).or_insert(built).clone())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<NodeId, ReplicaClient>> {
        self.clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
