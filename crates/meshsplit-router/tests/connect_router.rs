//! Connect router behaviour against the in-memory control plane.
//!
//! Covers bootstrap, idempotent reconciliation, weight round trips,
//! corruption detection, and failover population.

use std::sync::Arc;

use meshsplit_core::{RolloutTarget, RouteWeights};
use meshsplit_router::connect::{
    ConfigEntry, EntryKind, ServiceResolver, ServiceSplit, ServiceSplitter,
};
use meshsplit_router::{ConnectRouter, InMemoryControlPlane, Router, RouterError};

fn target() -> RolloutTarget {
    RolloutTarget::from_name("podinfo", "test")
}

fn setup(datacenters: &[&str]) -> (Arc<InMemoryControlPlane>, ConnectRouter) {
    let plane = Arc::new(InMemoryControlPlane::with_datacenters(datacenters));
    let router = ConnectRouter::new(plane.clone());
    (plane, router)
}

fn resolver(plane: &InMemoryControlPlane) -> ServiceResolver {
    match plane.entry(EntryKind::ServiceResolver, "podinfo") {
        Some(ConfigEntry::ServiceResolver(r)) => r,
        other => panic!("expected resolver, got {other:?}"),
    }
}

fn splitter(plane: &InMemoryControlPlane) -> ServiceSplitter {
    match plane.entry(EntryKind::ServiceSplitter, "podinfo") {
        Some(ConfigEntry::ServiceSplitter(s)) => s,
        other => panic!("expected splitter, got {other:?}"),
    }
}

fn weights(primary: u32, canary: u32) -> RouteWeights {
    RouteWeights::new(primary, canary, false).unwrap()
}

// ── Reconcile ──────────────────────────────────────────────────────

#[test]
fn reconcile_bootstraps_primary_only_split() {
    let (plane, router) = setup(&["dc1"]);
    router.reconcile(&target()).unwrap();

    let split = splitter(&plane);
    assert_eq!(split.splits.len(), 1);
    assert_eq!(split.splits[0].service_subset, "primary");
    assert_eq!(split.splits[0].weight, 100.0);

    let routes = router.get_routes(&target()).unwrap();
    assert_eq!(routes, weights(100, 0));
}

#[test]
fn reconcile_writes_resolver_before_splitter() {
    let (plane, router) = setup(&["dc1"]);
    router.reconcile(&target()).unwrap();
    assert_eq!(
        plane.write_log(),
        vec![EntryKind::ServiceResolver, EntryKind::ServiceSplitter]
    );
}

#[test]
fn reconcile_is_idempotent() {
    let (plane, router) = setup(&["dc1"]);
    router.reconcile(&target()).unwrap();
    router.reconcile(&target()).unwrap();
    assert_eq!(plane.write_count(EntryKind::ServiceSplitter), 1);
}

#[test]
fn reconcile_leaves_existing_weights_alone() {
    let (plane, router) = setup(&["dc1"]);
    router.reconcile(&target()).unwrap();
    router.set_routes(&target(), weights(70, 30)).unwrap();

    router.reconcile(&target()).unwrap();
    assert_eq!(router.get_routes(&target()).unwrap(), weights(70, 30));
    assert_eq!(plane.write_count(EntryKind::ServiceSplitter), 2);
}

#[test]
fn reconcile_fails_fast_on_resolver_write() {
    let (plane, router) = setup(&["dc1"]);
    plane.fail_writes("connection reset");

    let err = router.reconcile(&target()).unwrap_err();
    match err {
        RouterError::WriteFailed {
            kind,
            apex,
            namespace,
            reason,
        } => {
            assert_eq!(kind, "service-resolver");
            assert_eq!(apex, "podinfo");
            assert_eq!(namespace, "test");
            assert!(reason.contains("connection reset"));
        }
        other => panic!("expected WriteFailed, got {other:?}"),
    }
    assert!(plane.entry(EntryKind::ServiceSplitter, "podinfo").is_none());
}

#[test]
fn reconcile_reports_unacknowledged_write() {
    let (plane, router) = setup(&["dc1"]);
    plane.reject_writes();
    let err = router.reconcile(&target()).unwrap_err();
    assert!(matches!(err, RouterError::WriteFailed { .. }));
    assert!(err.to_string().contains("service-resolver podinfo.test"));
}

#[test]
fn reconcile_surfaces_splitter_read_failure() {
    let (plane, router) = setup(&["dc1"]);
    plane.fail_reads("read timeout");

    let err = router.reconcile(&target()).unwrap_err();
    match &err {
        RouterError::Read {
            kind,
            apex,
            namespace,
            source,
        } => {
            assert_eq!(*kind, "service-splitter");
            assert_eq!(apex, "podinfo");
            assert_eq!(namespace, "test");
            assert_eq!(source.to_string(), "read timeout");
        }
        other => panic!("expected Read, got {other:?}"),
    }
    assert!(!err.is_not_found());
    assert_eq!(
        err.to_string(),
        "failed to read service-splitter podinfo.test: read timeout"
    );
    assert_eq!(plane.write_count(EntryKind::ServiceSplitter), 0);
}

#[test]
fn read_failure_never_overwrites_live_weights() {
    let (plane, router) = setup(&["dc1"]);
    router.reconcile(&target()).unwrap();
    router.set_routes(&target(), weights(60, 40)).unwrap();

    plane.fail_reads("read timeout");
    assert!(matches!(
        router.reconcile(&target()),
        Err(RouterError::Read { .. })
    ));
    assert!(matches!(
        router.get_routes(&target()),
        Err(RouterError::Read { .. })
    ));
    assert_eq!(plane.write_count(EntryKind::ServiceSplitter), 2);

    plane.restore_reads();
    assert_eq!(router.get_routes(&target()).unwrap(), weights(60, 40));
}

// ── Resolver ───────────────────────────────────────────────────────

#[test]
fn resolver_subsets_follow_primary_name() {
    let (plane, router) = setup(&["dc1"]);
    let t = RolloutTarget::new("app", "app-v1", "app-v2", "prod");
    router.reconcile(&t).unwrap();

    let resolver = match plane.entry(EntryKind::ServiceResolver, "app") {
        Some(ConfigEntry::ServiceResolver(r)) => r,
        other => panic!("expected resolver, got {other:?}"),
    };
    assert_eq!(resolver.default_subset, "primary");
    assert_eq!(resolver.subsets.len(), 2);
    assert_eq!(resolver.subsets["primary"].filter, "Service.ID matches \"app-v1-.+\"");
    assert_eq!(resolver.subsets["canary"].filter, "Service.ID not matches \"app-v1-.+\"");
}

#[test]
fn failover_lists_remote_datacenters_on_both_subsets() {
    let (plane, router) = setup(&["dc1", "dc2", "dc3"]);
    router.reconcile(&target()).unwrap();

    let resolver = resolver(&plane);
    assert_eq!(resolver.failover.len(), 2);
    for subset in ["primary", "canary"] {
        let failover = &resolver.failover[subset];
        assert_eq!(failover.service, "podinfo");
        assert_eq!(failover.service_subset, subset);
        assert_eq!(failover.datacenters, vec!["dc2", "dc3"]);
    }
}

#[test]
fn clean_reconcile_reports_discovered_failover() {
    let (_plane, router) = setup(&["dc1", "dc2"]);
    let discovery = router.reconcile_with_discovery(&target()).unwrap();
    assert!(!discovery.degraded);
    assert_eq!(discovery.datacenters, vec!["dc2"]);
}

#[test]
fn no_failover_without_remote_datacenters() {
    let (plane, router) = setup(&[]);
    router.reconcile(&target()).unwrap();
    assert!(resolver(&plane).failover.is_empty());

    let (plane, router) = setup(&["dc1"]);
    router.reconcile(&target()).unwrap();
    assert!(resolver(&plane).failover.is_empty());
}

#[test]
fn discovery_failure_does_not_abort_reconcile() {
    let (plane, router) = setup(&["dc1", "dc2"]);
    plane.fail_discovery("catalog unavailable");

    let discovery = router.reconcile_with_discovery(&target()).unwrap();
    assert!(discovery.degraded);
    assert!(discovery.datacenters.is_empty());
    assert!(resolver(&plane).failover.is_empty());
    assert_eq!(router.get_routes(&target()).unwrap(), weights(100, 0));
}

// ── Routes ─────────────────────────────────────────────────────────

#[test]
fn set_then_get_round_trips() {
    let (_plane, router) = setup(&["dc1"]);
    router.reconcile(&target()).unwrap();

    router.set_routes(&target(), weights(90, 10)).unwrap();
    assert_eq!(router.get_routes(&target()).unwrap(), weights(90, 10));

    router.set_routes(&target(), weights(100, 0)).unwrap();
    assert_eq!(router.get_routes(&target()).unwrap(), weights(100, 0));
}

#[test]
fn zero_canary_is_physically_omitted() {
    let (plane, router) = setup(&["dc1"]);
    router.set_routes(&target(), weights(50, 50)).unwrap();
    router.set_routes(&target(), weights(100, 0)).unwrap();

    let split = splitter(&plane);
    assert_eq!(split.splits.len(), 1);
    assert_eq!(split.weight_of("canary"), None);
}

#[test]
fn full_canary_reads_back() {
    let (_plane, router) = setup(&["dc1"]);
    router.set_routes(&target(), weights(0, 100)).unwrap();
    assert_eq!(router.get_routes(&target()).unwrap(), weights(0, 100));
}

#[test]
fn mirror_is_ignored() {
    let (_plane, router) = setup(&["dc1"]);
    let mirrored = RouteWeights::new(80, 20, true).unwrap();
    router.set_routes(&target(), mirrored).unwrap();

    let routes = router.get_routes(&target()).unwrap();
    assert_eq!((routes.primary, routes.canary, routes.mirror), (80, 20, false));
}

#[test]
fn get_routes_before_reconcile_is_not_found() {
    let (_plane, router) = setup(&["dc1"]);
    let err = router.get_routes(&target()).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "service-splitter podinfo.test not found");
}

#[test]
fn get_routes_detects_empty_split() {
    let (plane, router) = setup(&["dc1"]);
    plane.insert(ConfigEntry::ServiceSplitter(ServiceSplitter {
        name: "podinfo".to_string(),
        splits: vec![],
    }));
    let err = router.get_routes(&target()).unwrap_err();
    assert!(matches!(err, RouterError::ConfigInvalid { .. }));
}

#[test]
fn get_routes_ignores_foreign_subsets() {
    let (plane, router) = setup(&["dc1"]);
    plane.insert(ConfigEntry::ServiceSplitter(ServiceSplitter {
        name: "podinfo".to_string(),
        splits: vec![ServiceSplit {
            weight: 100.0,
            service: "podinfo".to_string(),
            service_subset: "blue".to_string(),
        }],
    }));
    let err = router.get_routes(&target()).unwrap_err();
    assert!(matches!(err, RouterError::ConfigInvalid { .. }));
}

#[test]
fn set_routes_replaces_split_wholesale() {
    let (plane, router) = setup(&["dc1"]);
    plane.insert(ConfigEntry::ServiceSplitter(ServiceSplitter {
        name: "podinfo".to_string(),
        splits: vec![ServiceSplit {
            weight: 40.0,
            service: "podinfo".to_string(),
            service_subset: "blue".to_string(),
        }],
    }));

    router.set_routes(&target(), weights(60, 40)).unwrap();
    let split = splitter(&plane);
    let subsets: Vec<&str> = split.splits.iter().map(|s| s.service_subset.as_str()).collect();
    assert_eq!(subsets, vec!["primary", "canary"]);
}

#[test]
fn set_routes_write_failure_carries_context() {
    let (plane, router) = setup(&["dc1"]);
    plane.fail_writes("timeout");
    let err = router.set_routes(&target(), weights(90, 10)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to write service-splitter podinfo.test: timeout"
    );
}
