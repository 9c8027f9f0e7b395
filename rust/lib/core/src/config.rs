use std::path::PathBuf;

/// Where the embedded database lives.
///
/// Built by the server binary from its config file and the `--db` flag,
/// then handed to storage initialization.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Directory holding the embedded database.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/data.redb` if not specified.
    pub db_path: Option<PathBuf>,
}

impl ServiceConfig {
    /// Resolve the redb database path, falling back to `{data_dir}/data.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            self.data_dir
                .as_ref()
                .map(|d| d.join("data.redb"))
                .unwrap_or_else(|| PathBuf::from("data.redb"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_db_path() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/data/data.redb"));

        let explicit = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            db_path: Some(PathBuf::from("/elsewhere/meals.redb")),
        };
        assert_eq!(explicit.resolve_db_path(), PathBuf::from("/elsewhere/meals.redb"));

        assert_eq!(ServiceConfig::default().resolve_db_path(), PathBuf::from("data.redb"));
    }
}
