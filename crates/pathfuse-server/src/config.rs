//! Server configuration read from the environment at start-up.
//!
//! | Variable | Default |
//! |---|---|
//! | `PATHFUSE_DB_PATH` | `pathfuse.db` |
//! | `PATHFUSE_HOST` | `0.0.0.0` |
//! | `PATHFUSE_PORT` | `5000` |
//! | `PATHFUSE_RESOURCES` | `kegg,reactome,wikipathways` |
//! | `PATHFUSE_OVERLAP_DETAIL_LIMIT` | `1000` |

use std::str::FromStr;

use pathfuse_storage::{ManagerRegistry, DEFAULT_RESOURCES};

/// Total node count up to which overlap records carry node lists by default.
pub const DEFAULT_OVERLAP_DETAIL_LIMIT: usize = 1000;

/// A variable was set to something that does not parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {var}: {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub host: String,
    pub port: u16,
    pub resources: Vec<String>,
    pub overlap_detail_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: "pathfuse.db".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            resources: DEFAULT_RESOURCES.iter().map(|r| r.to_string()).collect(),
            overlap_detail_limit: DEFAULT_OVERLAP_DETAIL_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();
        if let Some(db_path) = lookup("PATHFUSE_DB_PATH") {
            config.db_path = db_path;
        }
        if let Some(host) = lookup("PATHFUSE_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PATHFUSE_PORT") {
            config.port = parse("PATHFUSE_PORT", port)?;
        }
        if let Some(resources) = lookup("PATHFUSE_RESOURCES") {
            config.resources = resources
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(limit) = lookup("PATHFUSE_OVERLAP_DETAIL_LIMIT") {
            config.overlap_detail_limit = parse("PATHFUSE_OVERLAP_DETAIL_LIMIT", limit)?;
        }
        Ok(config)
    }

    /// `host:port` for the listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn registry(&self) -> ManagerRegistry {
        ManagerRegistry::from_resources(&self.resources)
    }
}

fn parse<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError { var, value })
}
