//! Server-side configuration file.
//!
//! ```toml
//! [storage]
//! backend = "redb"
//! data_dir = "/var/lib/foodhub"
//! # db_path = "/var/lib/foodhub/meals.redb"
//!
//! [warden]
//! password = "change-me"
//!
//! [gate]
//! timeout_ms = 2000
//!
//! [[departments]]
//! code = "CSE"
//! name = "Computer Science"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use meal::model::Department;

/// Directory holding named configurations.
pub const CONFIG_DIR: &str = "/etc/foodhub";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub warden: WardenConfig,
    #[serde(default)]
    pub gate: GateConfig,
    /// Empty means the built-in hostel list.
    #[serde(default)]
    pub departments: Vec<Department>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Redb,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub data_dir: String,
    /// redb file; defaults to `{data_dir}/data.redb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub timeout_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { timeout_ms: 2000 }
    }
}

impl ServerConfig {
    /// A bare name resolves to `/etc/foodhub/<name>.toml`; anything with a
    /// `/` or `.` is taken as a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{name_or_path}.toml"))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("hostel"),
            PathBuf::from("/etc/foodhub/hostel.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./dev.toml"),
            PathBuf::from("./dev.toml")
        );
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostel.toml");
        std::fs::write(
            &path,
            r#"
[storage]
backend = "memory"

[warden]
password = "pw"

[gate]
timeout_ms = 500

[[departments]]
code = "CSE"
name = "Computer Science"

[[departments]]
code = "CIVIL"
name = "Civil"
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.storage.backend, Backend::Memory);
        assert_eq!(config.gate.timeout_ms, 500);
        assert_eq!(config.departments.len(), 2);
        assert_eq!(config.departments[1].code, "CIVIL");
    }

    #[test]
    fn test_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
[storage]
data_dir = "/tmp/foodhub"

[warden]
password = "pw"
"#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, Backend::Redb);
        assert!(config.storage.db_path.is_none());
        assert_eq!(config.gate.timeout_ms, 2000);
        assert!(config.departments.is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(ServerConfig::load(Path::new("/nonexistent/foodhub.toml")).is_err());
    }
}
