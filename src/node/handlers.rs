//! Node API Handlers
//!
//! HTTP endpoints that expose one node to clients and peers. Each handler
//! inspects the request's `is_internal` flag: peer traffic goes straight to
//! the local store, client traffic goes through the coordinator. Internal
//! requests must never reach the coordinator, otherwise a replica fan-out
//! would trigger further fan-outs across the cluster without bound.
//!
//! Handlers answer HTTP 200 unconditionally and report the outcome in the
//! response body, so callers can tell "key not found" from "peer down".

use std::sync::Arc;

use axum::extract::Extension;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::coordinator::Node;
use super::protocol::{
    GetRequest, GetResponse, PutRequest, PutResponse, ENDPOINT_GET, ENDPOINT_METRICS, ENDPOINT_PUT,
};
use super::types::MetricsSnapshot;

/// Builds the node's router. Shared by the node binary and the cluster
/// tests so both serve the identical surface.
pub fn router(node: Arc<Node>) -> Router {
    Router::new()
        .route(ENDPOINT_PUT, post(handle_put))
        .route(ENDPOINT_GET, post(handle_get))
        .route(ENDPOINT_METRICS, get(handle_metrics))
        .layer(Extension(node))
}

/// PUT handler.
///
/// Internal requests carry the coordinator-minted version and apply it to
/// the local store verbatim. External requests make this node the
/// coordinator for the write.
pub async fn handle_put(
    Extension(node): Extension<Arc<Node>>,
    Json(request): Json<PutRequest>,
) -> Json<PutResponse> {
    if request.is_internal {
        let Some(version) = request.version else {
            // Peers always attach a version; a request without one is a
            // malformed caller, not a stale write.
            tracing::warn!(key = %request.key, "internal put without version");
            return Json(PutResponse { success: false });
        };
        tracing::debug!(node = %node.node_id(), key = %request.key, "internal put");
        let success = node.apply_put_local(&request.key, &request.value, version);
        return Json(PutResponse { success });
    }

    let success = node.put(&request.key, &request.value).await;
    Json(PutResponse { success })
}

/// GET handler.
///
/// Internal requests return exactly the local entry; external requests run
/// the coordinator's read path, including read repair.
pub async fn handle_get(
    Extension(node): Extension<Arc<Node>>,
    Json(request): Json<GetRequest>,
) -> Json<GetResponse> {
    let entry = if request.is_internal {
        tracing::debug!(node = %node.node_id(), key = %request.key, "internal get");
        node.local_get(&request.key)
    } else {
        node.get(&request.key).await
    };
    Json(GetResponse::from_entry(entry))
}

/// Counter snapshot.
pub async fn handle_metrics(Extension(node): Extension<Arc<Node>>) -> Json<MetricsSnapshot> {
    Json(node.metrics())
}
