//! The router contract implemented by every mesh backend.

use meshsplit_core::{MeshProvider, RolloutTarget, RouteWeights};

use crate::error::RouterResult;

/// Manages the backend resources that realize a weighted traffic split
/// for one rollout target.
///
/// Calls are synchronous round trips to the mesh. Implementations hold
/// no locks across calls, so callers must not overlap `reconcile` and
/// `set_routes` for the same target.
pub trait Router: Send + Sync {
    /// Backend this router talks to.
    fn provider(&self) -> MeshProvider;

    /// Backend-specific pre-flight. Most routers have none.
    fn initialize(&self, _target: &RolloutTarget) -> RouterResult<()> {
        Ok(())
    }

    /// Ensure the routing resources for `target` exist. Converged calls
    /// have no observable effect.
    fn reconcile(&self, target: &RolloutTarget) -> RouterResult<()>;

    /// Read the current primary/canary weights.
    fn get_routes(&self, target: &RolloutTarget) -> RouterResult<RouteWeights>;

    /// Replace the current primary/canary weights.
    fn set_routes(&self, target: &RolloutTarget, weights: RouteWeights) -> RouterResult<()>;
}
