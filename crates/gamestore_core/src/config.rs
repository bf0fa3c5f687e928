//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe where the store lives, how to log and which roles are trusted.
//! - Load that description from a JSON document.
//!
//! # Invariants
//! - Every field has a default; an empty object `{}` is a valid config.
//! - `log_dir`, when set, must be absolute (checked by `init_logging`).

use crate::access::RolePolicy;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite file; `None` means an in-memory store.
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    /// Directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub roles: RolePolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            roles: RolePolicy::default(),
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use crate::access::Privilege;
    use std::path::PathBuf;

    #[test]
    fn empty_object_yields_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.database_path.is_none());
        assert_eq!(config.roles.privilege_of("admin"), Some(Privilege::Full));
    }

    #[test]
    fn parses_all_fields() {
        let config = CoreConfig::from_json_str(
            r#"{
                "database_path": "/tmp/games.db",
                "log_level": "warn",
                "log_dir": "/tmp/logs",
                "roles": { "owner": "full", "viewer": "read" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/games.db")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.roles.privilege_of("viewer"), Some(Privilege::Read));
        assert_eq!(config.roles.privilege_of("admin"), None);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_privileges() {
        assert!(matches!(
            CoreConfig::from_json_str(r#"{"db": "x"}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(CoreConfig::from_json_str(r#"{"roles": {"admin": "root"}}"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CoreConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
