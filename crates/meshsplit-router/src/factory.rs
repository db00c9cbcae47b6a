//! Router selection by mesh provider.

use std::sync::Arc;

use meshsplit_core::MeshProvider;
use meshsplit_core::config::RouterConfig;

use crate::connect::{ConnectRouter, ControlPlaneClient};
use crate::noop::NoopRouter;
use crate::router::Router;

/// Builds routers for a mesh provider, sharing one control plane client.
pub struct RouterFactory {
    client: Arc<dyn ControlPlaneClient>,
    local_datacenter: Option<String>,
}

impl RouterFactory {
    pub fn new(client: Arc<dyn ControlPlaneClient>) -> Self {
        Self {
            client,
            local_datacenter: None,
        }
    }

    pub fn from_config(client: Arc<dyn ControlPlaneClient>, config: &RouterConfig) -> Self {
        Self {
            client,
            local_datacenter: config.local_datacenter.clone(),
        }
    }

    /// Router for `provider`.
    pub fn router(&self, provider: MeshProvider) -> Box<dyn Router> {
        match provider {
            MeshProvider::Connect => {
                let router = ConnectRouter::new(self.client.clone());
                match &self.local_datacenter {
                    Some(dc) => Box::new(router.with_local_datacenter(dc.clone())),
                    None => Box::new(router),
                }
            }
            MeshProvider::Noop => Box::new(NoopRouter::new()),
        }
    }
}
