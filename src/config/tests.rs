use super::*;

fn valid_config() -> NodeConfig {
    NodeConfig {
        node_id: NodeId::from("nodeA"),
        bind_addr: "0.0.0.0".to_string(),
        port: 5000,
        replication_factor: 3,
        write_quorum: 2,
    }
}

#[test]
fn valid_config_passes() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn rejects_zero_replication_factor() {
    let mut cfg = valid_config();
    cfg.replication_factor = 0;
    cfg.write_quorum = 0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("replication_factor"));
}

#[test]
fn rejects_zero_write_quorum() {
    let mut cfg = valid_config();
    cfg.write_quorum = 0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("write_quorum must be >= 1"));
}

#[test]
fn rejects_quorum_above_replication_factor() {
    let mut cfg = valid_config();
    cfg.write_quorum = 4;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("cannot exceed"));
}

#[test]
fn rejects_zero_port() {
    let mut cfg = valid_config();
    cfg.port = 0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("port"));
}

#[test]
fn rejects_empty_node_id() {
    let mut cfg = valid_config();
    cfg.node_id = NodeId::from("");
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("node_id"));
}

#[test]
fn cluster_file_defaults_apply_when_fields_are_omitted() {
    let file = parse_cluster_toml("").unwrap();

    assert_eq!(file.replication_factor, DEFAULT_REPLICATION_FACTOR);
    assert_eq!(file.write_quorum, DEFAULT_WRITE_QUORUM);
    assert!(file.cluster.seeds.is_empty());
}

#[test]
fn cluster_file_parses_policy_and_seeds() {
    let raw = r#"
        replication_factor = 2
        write_quorum = 2

        [[cluster.seeds]]
        node_id = "n1"
        address = "127.0.0.1:7001"

        [[cluster.seeds]]
        node_id = "n2"
        address = "127.0.0.1:7002"
    "#;

    let file = parse_cluster_toml(raw).unwrap();

    assert_eq!(file.replication_factor, 2);
    assert_eq!(file.write_quorum, 2);
    assert_eq!(file.cluster.seeds.len(), 2);
    assert_eq!(file.cluster.seeds[0].node_id, "n1");
    assert_eq!(file.cluster.seeds[1].address, "127.0.0.1:7002");
}

#[test]
fn malformed_cluster_file_is_an_error() {
    assert!(parse_cluster_toml("replication_factor = \"three\"").is_err());
}
