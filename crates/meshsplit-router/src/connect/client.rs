//! Outbound client interface for the Connect control plane.

use meshsplit_core::ClientError;

use super::entry::{ConfigEntry, EntryKind};

/// Calls the Connect router needs from the mesh control plane.
///
/// Implementations wrap the real HTTP/RPC client; deadlines are
/// inherited from that transport.
pub trait ControlPlaneClient: Send + Sync {
    /// List known datacenters. The catalog lists the local datacenter
    /// first.
    fn datacenters(&self) -> Result<Vec<String>, ClientError>;

    /// Fetch a config entry by kind and name. `Ok(None)` means the entry
    /// does not exist.
    fn get_entry(&self, kind: EntryKind, name: &str) -> Result<Option<ConfigEntry>, ClientError>;

    /// Create or replace a config entry. Returns whether the control
    /// plane accepted the write.
    fn set_entry(&self, entry: &ConfigEntry) -> Result<bool, ClientError>;
}
