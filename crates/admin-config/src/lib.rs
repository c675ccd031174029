//! Configuration of the admin gateway, read from a TOML file.

pub mod cors;

use serde_with::DisplayFromStr;
use size::Size;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

pub use cors::*;

/// Route of the GraphQL admin endpoint when none is configured.
pub const DEFAULT_GRAPH_PATH: &str = "/admin";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read the configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[serde_with::serde_as]
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Configuration struct to define settings for the admin gateway.
pub struct Config {
    /// Where the GraphQL route lives and whether it answers introspection
    pub graph: GraphConfig,
    /// Server bind settings
    pub network: NetworkConfig,
    /// General settings for request execution
    pub gateway: GatewayConfig,
    /// Larger POST bodies are refused before parsing
    #[serde_as(as = "DisplayFromStr")]
    pub request_body_limit: Size,
    /// Permissive CORS applies when absent
    pub cors: Option<CorsConfig>,
    /// Server TLS settings
    pub tls: Option<TlsConfig>,
    /// Operation limit settings
    pub operation_limits: OperationLimitsConfig,
    /// Liveness route, on the admin listener unless `listen` is set
    pub health: HealthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: Default::default(),
            network: Default::default(),
            gateway: Default::default(),
            request_body_limit: Size::from_mebibytes(2),
            cors: Default::default(),
            tls: Default::default(),
            operation_limits: Default::default(),
            health: Default::default(),
        }
    }
}

impl Config {
    /// Reads and parses the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// The maximum accepted request body, in bytes.
    pub fn request_body_limit_bytes(&self) -> usize {
        self.request_body_limit.bytes().max(0) as usize
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    pub path: String,
    pub introspection: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_GRAPH_PATH.to_string(),
            introspection: false,
        }
    }
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub listen_address: Option<SocketAddr>,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Deadline for executing a single admin request.
    #[serde(deserialize_with = "duration_str::deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, serde::Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TlsConfig {
    pub certificate: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationLimitsConfig {
    /// Deepest selection set nesting accepted, fragments included.
    pub depth: Option<usize>,
    /// Total field count accepted for one operation.
    pub complexity: Option<usize>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthConfig {
    pub enabled: bool,
    /// Serve the health check on a separate listener instead of the admin one.
    pub listen: Option<SocketAddr>,
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: None,
            path: "/health".to_string(),
        }
    }
}
