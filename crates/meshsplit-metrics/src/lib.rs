//! meshsplit-metrics — canary health signals from telemetry backends.
//!
//! A [`MetricsObserver`] owns a static catalog of query templates for
//! one telemetry backend, renders them against a
//! [`MetricQueryModel`](meshsplit_core::MetricQueryModel), runs them
//! through a [`TelemetryClient`] and converts the scalar result into a
//! typed signal.
//!
//! # Architecture
//!
//! ```text
//! MetricsObserver
//!   ├── request_success_rate() → percentage in [0, 100]
//!   └── request_duration()     → Duration (p99, from milliseconds)
//!
//! QueryCatalog (per backend, const)
//!   └── template::render() → backend-native query text
//!         └── TelemetryClient::run_query() → f64
//! ```

pub mod client;
pub mod connect;
pub mod error;
pub mod factory;
pub mod kind;
pub mod observer;
pub mod template;

pub use client::{StaticTelemetryClient, TelemetryClient};
pub use connect::ConnectObserver;
pub use error::{MetricsError, MetricsResult};
pub use factory::ObserverFactory;
pub use kind::MetricKind;
pub use observer::{MetricsObserver, QueryCatalog};
pub use template::{TemplateError, render};
