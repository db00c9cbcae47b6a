pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use config::MeshsplitConfig;
pub use error::{ClientError, CoreError, CoreResult};
pub use provider::{MeshProvider, MetricsProvider};
pub use types::*;
