//! meshsplit-router — weighted primary/canary traffic splits.
//!
//! A [`Router`] translates an abstract weight pair into the routing
//! resources of one service mesh. Every implementation follows the same
//! contract: `reconcile` makes sure the resources exist and is safe to
//! call on every tick, `set_routes` replaces the split, and `get_routes`
//! reads it back.
//!
//! # Components
//!
//! - **`router`** — The `Router` trait
//! - **`connect`** — Consul Connect backend (service resolver + splitter)
//! - **`noop`** — Router for workloads without load-balanced traffic
//! - **`subset`** — Instance filters shared by the primary and canary subsets
//! - **`factory`** — Router selection by `MeshProvider`

pub mod connect;
pub mod error;
pub mod factory;
pub mod noop;
pub mod router;
pub mod subset;

pub use connect::{ConnectRouter, ControlPlaneClient, Discovery, InMemoryControlPlane};
pub use error::{RouterError, RouterResult};
pub use factory::RouterFactory;
pub use noop::NoopRouter;
pub use router::Router;
pub use subset::SubsetFilter;
