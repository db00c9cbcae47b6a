//! In-memory control plane.
//!
//! Stores config entries in a map and records every accepted write.
//! Used for dry runs and tests; discovery failures, read failures and
//! rejected writes can be injected to exercise the router's error paths.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use meshsplit_core::ClientError;
use tracing::debug;

use super::client::ControlPlaneClient;
use super::entry::{ConfigEntry, EntryKind};

type EntryKey = (EntryKind, String);

/// Control plane state held entirely in process memory.
#[derive(Debug)]
pub struct InMemoryControlPlane {
    entries: RwLock<HashMap<EntryKey, ConfigEntry>>,
    datacenters: RwLock<Result<Vec<String>, String>>,
    read_failure: RwLock<Option<String>>,
    write_failure: RwLock<Option<WriteFailure>>,
    writes: RwLock<Vec<EntryKey>>,
}

/// How injected write failures surface.
#[derive(Debug, Clone)]
enum WriteFailure {
    /// The transport call itself fails.
    Error(String),
    /// The control plane answers but does not accept the entry.
    Rejected,
}

fn lock_err<T>(_: PoisonError<T>) -> ClientError {
    ClientError::new("control plane state lock poisoned")
}

impl InMemoryControlPlane {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            datacenters: RwLock::new(Ok(Vec::new())),
            read_failure: RwLock::new(None),
            write_failure: RwLock::new(None),
            writes: RwLock::new(Vec::new()),
        }
    }

    /// Control plane whose catalog reports `datacenters`, local first.
    pub fn with_datacenters<S: AsRef<str>>(datacenters: &[S]) -> Self {
        let plane = Self::new();
        plane.set_datacenters(datacenters);
        plane
    }

    pub fn set_datacenters<S: AsRef<str>>(&self, datacenters: &[S]) {
        let list = datacenters.iter().map(|d| d.as_ref().to_string()).collect();
        *self.datacenters.write().unwrap_or_else(PoisonError::into_inner) = Ok(list);
    }

    /// Make datacenter discovery fail with `msg`.
    pub fn fail_discovery(&self, msg: &str) {
        *self.datacenters.write().unwrap_or_else(PoisonError::into_inner) = Err(msg.to_string());
    }

    /// Make every subsequent entry read fail with `msg`.
    pub fn fail_reads(&self, msg: &str) {
        *self.read_failure.write().unwrap_or_else(PoisonError::into_inner) =
            Some(msg.to_string());
    }

    pub fn restore_reads(&self) {
        *self.read_failure.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Make every subsequent write fail at the transport level.
    pub fn fail_writes(&self, msg: &str) {
        *self.write_failure.write().unwrap_or_else(PoisonError::into_inner) =
            Some(WriteFailure::Error(msg.to_string()));
    }

    /// Make every subsequent write come back unacknowledged.
    pub fn reject_writes(&self) {
        *self.write_failure.write().unwrap_or_else(PoisonError::into_inner) =
            Some(WriteFailure::Rejected);
    }

    /// Accept writes again.
    pub fn accept_writes(&self) {
        *self.write_failure.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Store an entry directly, bypassing the write log.
    pub fn insert(&self, entry: ConfigEntry) {
        let key = (entry.kind(), entry.name().to_string());
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    /// Current entry for `kind`/`name`, if any.
    pub fn entry(&self, kind: EntryKind, name: &str) -> Option<ConfigEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(kind, name.to_string()))
            .cloned()
    }

    /// Number of accepted writes of `kind`.
    pub fn write_count(&self, kind: EntryKind) -> usize {
        self.writes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Kinds of all accepted writes, oldest first.
    pub fn write_log(&self) -> Vec<EntryKind> {
        self.writes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, _)| *k)
            .collect()
    }

    /// All stored entries, resolvers first, then by name.
    pub fn entries(&self) -> Vec<ConfigEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut list: Vec<ConfigEntry> = entries.values().cloned().collect();
        list.sort_by_key(|e| (e.kind() != EntryKind::ServiceResolver, e.name().to_string()));
        list
    }
}

impl Default for InMemoryControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPlaneClient for InMemoryControlPlane {
    fn datacenters(&self) -> Result<Vec<String>, ClientError> {
        self.datacenters
            .read()
            .map_err(lock_err)?
            .clone()
            .map_err(ClientError::new)
    }

    fn get_entry(&self, kind: EntryKind, name: &str) -> Result<Option<ConfigEntry>, ClientError> {
        if let Some(msg) = self.read_failure.read().map_err(lock_err)?.clone() {
            return Err(ClientError::new(msg));
        }
        let entries = self.entries.read().map_err(lock_err)?;
        Ok(entries.get(&(kind, name.to_string())).cloned())
    }

    fn set_entry(&self, entry: &ConfigEntry) -> Result<bool, ClientError> {
        match self.write_failure.read().map_err(lock_err)?.clone() {
            Some(WriteFailure::Error(msg)) => return Err(ClientError::new(msg)),
            Some(WriteFailure::Rejected) => return Ok(false),
            None => {}
        }

        let key = (entry.kind(), entry.name().to_string());
        self.entries
            .write()
            .map_err(lock_err)?
            .insert(key.clone(), entry.clone());
        debug!(kind = %key.0, name = %key.1, "config entry stored");
        self.writes.write().map_err(lock_err)?.push(key);
        Ok(true)
    }
}
