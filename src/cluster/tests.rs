use super::*;
use std::collections::HashSet;

#[test]
fn empty_cluster_behaves_gracefully() {
    let view = ClusterView::new(10);

    assert!(view.address_of(&NodeId::from("missing")).is_none());
    assert!(view.replica_set("key", 3).is_empty());
    assert!(view.owner_for_key("key").is_none());
    assert!(view.is_empty());
}

#[test]
fn add_and_lookup_node() {
    let view = ClusterView::new(10);

    view.add_node(NodeId::from("nodeA"), "localhost:5000");

    assert_eq!(
        view.address_of(&NodeId::from("nodeA")),
        Some("localhost:5000".to_string())
    );
    assert_eq!(view.node_ids(), vec![NodeId::from("nodeA")]);
}

#[test]
fn duplicate_add_does_not_overwrite() {
    let view = ClusterView::new(10);

    view.add_node(NodeId::from("nodeA"), "localhost:5000");
    view.add_node(NodeId::from("nodeA"), "localhost:6000");

    assert_eq!(
        view.address_of(&NodeId::from("nodeA")),
        Some("localhost:5000".to_string())
    );
    assert_eq!(view.len(), 1);
}

#[test]
fn remove_clears_membership_and_placement() {
    let view = ClusterView::new(10);

    view.add_node(NodeId::from("nodeA"), "localhost:5000");
    view.add_node(NodeId::from("nodeB"), "localhost:5001");

    view.remove_node(&NodeId::from("nodeA"));

    assert!(view.address_of(&NodeId::from("nodeA")).is_none());

    let replicas = view.replica_set("key", 2);
    assert_eq!(replicas, vec![NodeId::from("nodeB")]);
}

#[test]
fn remove_of_absent_node_is_noop() {
    let view = ClusterView::new(10);
    view.add_node(NodeId::from("nodeA"), "localhost:5000");

    view.remove_node(&NodeId::from("ghost"));

    assert_eq!(view.len(), 1);
}

#[test]
fn replica_set_is_unique_and_bounded_by_cluster_size() {
    let view = ClusterView::new(10);

    view.add_node(NodeId::from("A"), "localhost:5000");
    view.add_node(NodeId::from("B"), "localhost:5001");
    view.add_node(NodeId::from("C"), "localhost:5002");

    let replicas = view.replica_set("key", 10);
    let unique: HashSet<_> = replicas.iter().cloned().collect();

    assert_eq!(unique.len(), replicas.len());
    assert_eq!(replicas.len(), 3);
    for id in ["A", "B", "C"] {
        assert!(unique.contains(&NodeId::from(id)));
    }
}

#[test]
fn replica_set_is_deterministic_for_same_key() {
    let view = ClusterView::new(20);

    view.add_node(NodeId::from("A"), "localhost:5000");
    view.add_node(NodeId::from("B"), "localhost:5001");
    view.add_node(NodeId::from("C"), "localhost:5002");

    assert_eq!(view.replica_set("key", 2), view.replica_set("key", 2));
}

#[test]
fn replication_factor_zero_returns_empty() {
    let view = ClusterView::new(10);
    view.add_node(NodeId::from("A"), "localhost:5000");

    assert!(view.replica_set("key", 0).is_empty());
}

#[test]
fn replica_set_starts_at_the_owner() {
    let view = ClusterView::new(100);
    view.add_node(NodeId::from("A"), "localhost:5000");
    view.add_node(NodeId::from("B"), "localhost:5001");
    view.add_node(NodeId::from("C"), "localhost:5002");

    for i in 0..200 {
        let key = format!("key_{}", i);
        let owner = view.owner_for_key(&key);
        let replicas = view.replica_set(&key, 3);
        assert_eq!(owner.as_ref(), replicas.first());
    }
}
