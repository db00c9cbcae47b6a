//! Consul Connect backend.
//!
//! Traffic is split with two config entries named after the apex
//! service: a `service-resolver` defining the `primary` and `canary`
//! subsets (plus optional cross-datacenter failover) and a
//! `service-splitter` assigning weights to those subsets.

pub mod client;
pub mod entry;
pub mod memory;
pub mod router;

pub use client::ControlPlaneClient;
pub use entry::{
    ConfigEntry, EntryKind, ResolverFailover, ResolverSubset, ServiceResolver, ServiceSplit,
    ServiceSplitter,
};
pub use memory::InMemoryControlPlane;
pub use router::{ConnectRouter, Discovery};
