//! Server configuration read from the environment.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DB_PATH: &str = "tripcheck.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `TRIPCHECK_BIND`
    pub bind_addr: String,
    /// `TRIPCHECK_DB_PATH`
    pub db_path: PathBuf,
    /// `TRIPCHECK_LOG_JSON`
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("TRIPCHECK_BIND").unwrap_or(defaults.bind_addr),
            db_path: lookup("TRIPCHECK_DB_PATH").map(PathBuf::from).unwrap_or(defaults.db_path),
            log_json: lookup("TRIPCHECK_LOG_JSON")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.log_json),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config_from(&[]), ServerConfig::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("TRIPCHECK_BIND", "0.0.0.0:8080"),
            ("TRIPCHECK_DB_PATH", "/tmp/trips.db"),
            ("TRIPCHECK_LOG_JSON", "yes"),
        ]);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/trips.db"));
        assert!(config.log_json);
    }

    #[test]
    fn test_unparseable_bool_falls_back() {
        assert!(!config_from(&[("TRIPCHECK_LOG_JSON", "maybe")]).log_json);
    }
}
