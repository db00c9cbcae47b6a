//! Connect router — manages the service resolver and splitter of an apex
//! service.

use std::collections::BTreeMap;
use std::sync::Arc;

use meshsplit_core::{MAX_WEIGHT, MeshProvider, RolloutTarget, RouteWeights, exceeds_epsilon};
use tracing::{debug, info, warn};

use super::client::ControlPlaneClient;
use super::entry::{
    ConfigEntry, EntryKind, ResolverFailover, ResolverSubset, ServiceResolver, ServiceSplit,
    ServiceSplitter,
};
use crate::error::{RouterError, RouterResult};
use crate::router::Router;
use crate::subset::{CANARY_SUBSET, PRIMARY_SUBSET, SubsetFilter};

/// Outcome of failover datacenter discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Remote datacenters to fail over to, in discovery order.
    pub datacenters: Vec<String>,
    /// Discovery failed and `datacenters` is empty because of it.
    pub degraded: bool,
}

/// Router backed by Consul Connect config entries.
pub struct ConnectRouter {
    client: Arc<dyn ControlPlaneClient>,
    local_datacenter: Option<String>,
}

impl ConnectRouter {
    pub fn new(client: Arc<dyn ControlPlaneClient>) -> Self {
        Self {
            client,
            local_datacenter: None,
        }
    }

    /// Exclude `datacenter` from failover targets by name instead of
    /// assuming the catalog lists the local datacenter first.
    pub fn with_local_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.local_datacenter = Some(datacenter.into());
        self
    }

    /// Look up remote datacenters. Failures degrade to an empty list.
    pub fn discover_failover(&self) -> Discovery {
        let all = match self.client.datacenters() {
            Ok(dcs) => dcs,
            Err(e) => {
                warn!(error = %e, "failed to fetch datacenter list, continuing without failover");
                return Discovery {
                    datacenters: Vec::new(),
                    degraded: true,
                };
            }
        };

        let datacenters = match &self.local_datacenter {
            Some(local) => all.into_iter().filter(|dc| dc != local).collect(),
            None => all.into_iter().skip(1).collect(),
        };

        Discovery {
            datacenters,
            degraded: false,
        }
    }

    /// Build the resolver entry for `target` with the given failover
    /// datacenters.
    pub fn build_resolver(target: &RolloutTarget, failover_dcs: &[String]) -> ServiceResolver {
        let apex = &target.apex_name;

        let mut subsets = BTreeMap::new();
        subsets.insert(
            PRIMARY_SUBSET.to_string(),
            ResolverSubset {
                filter: SubsetFilter::primary(&target.primary_name).expression(),
            },
        );
        subsets.insert(
            CANARY_SUBSET.to_string(),
            ResolverSubset {
                filter: SubsetFilter::canary(&target.primary_name).expression(),
            },
        );

        let mut failover = BTreeMap::new();
        if !failover_dcs.is_empty() {
            for subset in [PRIMARY_SUBSET, CANARY_SUBSET] {
                failover.insert(
                    subset.to_string(),
                    ResolverFailover {
                        service: apex.clone(),
                        service_subset: subset.to_string(),
                        datacenters: failover_dcs.to_vec(),
                    },
                );
            }
        }

        ServiceResolver {
            name: apex.clone(),
            default_subset: PRIMARY_SUBSET.to_string(),
            subsets,
            failover,
        }
    }

    /// Build the splitter entry for `target`. Subsets whose weight does
    /// not exceed the epsilon are left out.
    pub fn build_splitter(target: &RolloutTarget, weights: &RouteWeights) -> ServiceSplitter {
        let apex = &target.apex_name;
        let mut splits = Vec::with_capacity(2);

        for (subset, weight) in [
            (PRIMARY_SUBSET, weights.primary),
            (CANARY_SUBSET, weights.canary),
        ] {
            if exceeds_epsilon(f64::from(weight)) {
                splits.push(ServiceSplit {
                    weight: weight as f32,
                    service: apex.clone(),
                    service_subset: subset.to_string(),
                });
            }
        }

        ServiceSplitter {
            name: apex.clone(),
            splits,
        }
    }

    fn write(&self, target: &RolloutTarget, entry: &ConfigEntry) -> RouterResult<()> {
        let kind = entry.kind();
        match self.client.set_entry(entry) {
            Ok(true) => Ok(()),
            Ok(false) => Err(RouterError::write_failed(
                kind.as_str(),
                target,
                "entry was not accepted by the control plane",
            )),
            Err(e) => Err(RouterError::write_failed(kind.as_str(), target, e.to_string())),
        }
    }

    fn read(&self, target: &RolloutTarget, kind: EntryKind) -> RouterResult<Option<ConfigEntry>> {
        self.client
            .get_entry(kind, &target.apex_name)
            .map_err(|e| RouterError::read(kind.as_str(), target, e))
    }

    fn reconcile_resolver(&self, target: &RolloutTarget) -> RouterResult<Discovery> {
        let discovery = self.discover_failover();
        let resolver = Self::build_resolver(target, &discovery.datacenters);

        self.write(target, &ConfigEntry::ServiceResolver(resolver))?;
        debug!(
            apex = %target.apex_name,
            namespace = %target.namespace,
            failover = ?discovery.datacenters,
            degraded = discovery.degraded,
            "service resolver reconciled"
        );
        Ok(discovery)
    }

    fn reconcile_splitter(&self, target: &RolloutTarget) -> RouterResult<()> {
        if self.read(target, EntryKind::ServiceSplitter)?.is_some() {
            return Ok(());
        }

        info!(
            apex = %target.apex_name,
            namespace = %target.namespace,
            "creating service splitter with all traffic on primary"
        );
        self.set_routes(target, RouteWeights::bootstrap())
    }

    /// Reconcile `target` and report the failover discovery the resolver
    /// was built from, so callers can tell a degraded pass from a clean one.
    pub fn reconcile_with_discovery(&self, target: &RolloutTarget) -> RouterResult<Discovery> {
        // Resolver first: the splitter references its subsets.
        let discovery = self.reconcile_resolver(target)?;
        self.reconcile_splitter(target)?;
        Ok(discovery)
    }
}

impl Router for ConnectRouter {
    fn provider(&self) -> MeshProvider {
        MeshProvider::Connect
    }

    fn reconcile(&self, target: &RolloutTarget) -> RouterResult<()> {
        self.reconcile_with_discovery(target).map(|_| ())
    }

    fn get_routes(&self, target: &RolloutTarget) -> RouterResult<RouteWeights> {
        let splitter = match self.read(target, EntryKind::ServiceSplitter)? {
            Some(ConfigEntry::ServiceSplitter(s)) => s,
            Some(other) => {
                return Err(RouterError::config_invalid(
                    target,
                    format!("expected {} entry, found {}", EntryKind::ServiceSplitter, other.kind()),
                ));
            }
            None => {
                return Err(RouterError::not_found(
                    EntryKind::ServiceSplitter.as_str(),
                    target,
                ));
            }
        };

        let primary = stored_weight(target, splitter.weight_of(PRIMARY_SUBSET))?;
        let canary = stored_weight(target, splitter.weight_of(CANARY_SUBSET))?;

        if primary == 0 && canary == 0 {
            return Err(RouterError::config_invalid(
                target,
                format!(
                    "{} does not contain routes for the {PRIMARY_SUBSET} and {CANARY_SUBSET} subsets",
                    EntryKind::ServiceSplitter
                ),
            ));
        }

        Ok(RouteWeights {
            primary,
            canary,
            mirror: false,
        })
    }

    fn set_routes(&self, target: &RolloutTarget, weights: RouteWeights) -> RouterResult<()> {
        weights
            .validate()
            .map_err(|e| RouterError::invalid_weights(target, e))?;

        if weights.mirror {
            debug!(
                apex = %target.apex_name,
                namespace = %target.namespace,
                "traffic mirroring is not supported by service splitters, ignoring"
            );
        }

        let splitter = Self::build_splitter(target, &weights);
        self.write(target, &ConfigEntry::ServiceSplitter(splitter))?;
        debug!(
            apex = %target.apex_name,
            namespace = %target.namespace,
            primary = weights.primary,
            canary = weights.canary,
            "service splitter updated"
        );
        Ok(())
    }
}

/// Convert a stored split weight back into an integer route weight.
/// Missing and near-zero entries read as 0.
fn stored_weight(target: &RolloutTarget, weight: Option<f32>) -> RouterResult<u32> {
    let weight = f64::from(weight.unwrap_or(0.0));
    if !exceeds_epsilon(weight) {
        return Ok(0);
    }
    let rounded = weight.round();
    if rounded > f64::from(MAX_WEIGHT) {
        return Err(RouterError::config_invalid(
            target,
            format!("split weight {weight} exceeds {MAX_WEIGHT}"),
        ));
    }
    Ok(rounded as u32)
}
