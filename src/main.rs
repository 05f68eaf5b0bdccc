use std::path::PathBuf;
use std::sync::Arc;

use kv_cluster::cluster::{ClusterView, NodeId};
use kv_cluster::config::{self, NodeConfig};
use kv_cluster::logging::{self, LogLevel};
use kv_cluster::node::{handlers, Node};
use kv_cluster::ring::DEFAULT_VNODES;

/*
CLI:
  --id <node-id>           (required)
  --port <port>            (required, > 0)
  --config <cluster.toml>  (required)
  --log-level <none|info|debug>  (optional; KV_LOG_LEVEL is the fallback)
*/

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut node_id: Option<String> = None;
    let mut port: Option<u16> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut cli_level: Option<LogLevel> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--id" if i + 1 < args.len() => {
                node_id = Some(args[i + 1].clone());
                i += 2;
            }
            "--port" if i + 1 < args.len() => {
                port = args[i + 1].parse().ok();
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--log-level" if i + 1 < args.len() => {
                cli_level = Some(LogLevel::parse(&args[i + 1]));
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let (Some(node_id), Some(port), Some(config_path)) = (node_id, port, config_path) else {
        eprintln!("Usage: kv-node --id <node-id> --port <port> --config <cluster.toml> [--log-level <none|info|debug>]");
        std::process::exit(1);
    };

    let level = cli_level
        .or_else(logging::level_from_env)
        .unwrap_or(LogLevel::Info);
    logging::init(level);

    let file = config::load_cluster_file(&config_path)?;

    let cfg = NodeConfig {
        node_id: NodeId::new(node_id),
        bind_addr: "0.0.0.0".to_string(),
        port,
        replication_factor: file.replication_factor,
        write_quorum: file.write_quorum,
    };
    if let Err(error) = cfg.validate() {
        eprintln!("invalid configuration: {}", error);
        std::process::exit(1);
    }

    let cluster = Arc::new(ClusterView::new(DEFAULT_VNODES));
    for seed in &file.cluster.seeds {
        cluster.add_node(NodeId::new(seed.node_id.clone()), seed.address.clone());
    }

    // A node absent from the seed list still has to be routable, so it
    // registers itself under a loopback fallback.
    if cluster.address_of(&cfg.node_id).is_none() {
        let fallback = format!("localhost:{}", cfg.port);
        tracing::info!(node = %cfg.node_id, address = %fallback, "self-registering");
        cluster.add_node(cfg.node_id.clone(), fallback);
    }

    tracing::info!("cluster members:");
    for id in cluster.node_ids() {
        tracing::info!("  - {}", id);
    }

    let node = Arc::new(Node::new(cfg.clone(), cluster));
    let app = handlers::router(node);

    let listen_addr = format!("{}:{}", cfg.bind_addr, cfg.port);
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(node = %cfg.node_id, "listening on {}", listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
