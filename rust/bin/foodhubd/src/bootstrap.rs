//! Bootstrap: startup checks and storage initialization.
//!
//! When foodhubd starts:
//! 1. Verify the config is usable; refuse to start otherwise.
//! 2. Open the configured KV backend.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use foodhub_kv::KVStore;
use meal::model::Departments;
use tracing::info;

use crate::config::{Backend, ServerConfig};

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.warden.password.trim().is_empty() {
        anyhow::bail!("Warden password is empty in configuration.");
    }
    if config.storage.backend == Backend::Redb
        && config.storage.data_dir.trim().is_empty()
        && config.storage.db_path.is_none()
    {
        anyhow::bail!("Storage needs a data_dir or db_path in configuration.");
    }
    if config.gate.timeout_ms == 0 {
        anyhow::bail!("Gate timeout_ms must be greater than zero.");
    }
    departments(config)?;
    Ok(())
}

/// The configured department list, or the built-in one when none is given.
pub fn departments(config: &ServerConfig) -> anyhow::Result<Departments> {
    if config.departments.is_empty() {
        return Ok(Departments::hostel_default());
    }
    Departments::new(config.departments.clone())
        .map_err(|e| anyhow::anyhow!("invalid departments: {}", e))
}

pub fn gate_timeout(config: &ServerConfig) -> Duration {
    Duration::from_millis(config.gate.timeout_ms)
}

/// Open the KV backend named in the config.
pub fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn KVStore>> {
    match config.storage.backend {
        Backend::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            Ok(Arc::new(foodhub_kv::MemoryStore::new()))
        }
        Backend::Redb => {
            let core_config = foodhub_core::ServiceConfig {
                data_dir: Some(PathBuf::from(&config.storage.data_dir))
                    .filter(|d| !d.as_os_str().is_empty()),
                db_path: config.storage.db_path.as_ref().map(PathBuf::from),
            };
            let path = core_config.resolve_db_path();
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            info!("Opening redb store at {}", path.display());
            let store = foodhub_kv::RedbStore::open(&path)
                .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?;
            Ok(Arc::new(store))
        }
    }
}
