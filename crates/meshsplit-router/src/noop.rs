//! Router for workloads with no load-balanced traffic to manage.

use meshsplit_core::{MeshProvider, RolloutTarget, RouteWeights};
use tracing::debug;

use crate::error::{RouterError, RouterResult};
use crate::router::Router;

/// Manages nothing. Reconciliation always succeeds; reading or writing
/// weights is refused because there is no split to report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRouter;

impl NoopRouter {
    pub fn new() -> Self {
        Self
    }
}

impl Router for NoopRouter {
    fn provider(&self) -> MeshProvider {
        MeshProvider::Noop
    }

    fn reconcile(&self, target: &RolloutTarget) -> RouterResult<()> {
        debug!(apex = %target.apex_name, namespace = %target.namespace, "nothing to reconcile");
        Ok(())
    }

    fn get_routes(&self, target: &RolloutTarget) -> RouterResult<RouteWeights> {
        Err(RouterError::unsupported("get_routes", self.provider(), target))
    }

    fn set_routes(&self, target: &RolloutTarget, _weights: RouteWeights) -> RouterResult<()> {
        Err(RouterError::unsupported("set_routes", self.provider(), target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_and_reconcile_succeed() {
        let router = NoopRouter::new();
        let target = RolloutTarget::from_name("worker", "batch");
        router.initialize(&target).unwrap();
        router.reconcile(&target).unwrap();
        router.reconcile(&target).unwrap();
    }

    #[test]
    fn weights_are_refused() {
        let router = NoopRouter::new();
        let target = RolloutTarget::from_name("worker", "batch");

        let err = router.get_routes(&target).unwrap_err();
        assert!(matches!(err, RouterError::Unsupported { operation: "get_routes", .. }));

        let err = router
            .set_routes(&target, RouteWeights::bootstrap())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "set_routes is not supported by the noop router (worker.batch)"
        );
    }
}
