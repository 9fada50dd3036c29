//! Environment-backed runtime configuration.
//!
//! Values are read from process environment variables, with a `.env` file
//! loaded first when present. Every setting has a sensible default so the
//! service starts with no configuration at all.

use std::env;
use std::fmt;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment flavour the service believes it is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
        }
    }
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(AppEnvironment::Development),
            "production" | "prod" => Ok(AppEnvironment::Production),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

/// Top-level configuration assembled by [`AppConfig::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingConfig,
}

/// Listener settings for the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Log filtering settings consumed by the telemetry initialiser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Source of the percentile rank tables.
///
/// When `tables_path` is unset the compiled-in tables are used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingConfig {
    pub tables_path: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from the environment, falling back to defaults for
    /// anything unset.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = optional_env("APP_ENV")?
            .map(|value| value.parse())
            .transpose()?
            .unwrap_or(AppEnvironment::Development);

        let host = optional_env("APP_HOST")?
            .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
        let port = match optional_env("APP_PORT")? {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_SERVER_PORT,
        };

        let log_level =
            optional_env("APP_LOG_LEVEL")?.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let tables_path = optional_env("OLYMPIAD_RANK_TABLES")?.map(PathBuf::from);

        Ok(AppConfig {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ranking: RankingConfig { tables_path },
        })
    }
}

impl ServerConfig {
    /// Resolves the configured host and port into a bindable socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = if self.host == "localhost" {
            "127.0.0.1"
        } else {
            self.host.as_str()
        };
        let ip: IpAddr = host
            .parse()
            .map_err(|source: AddrParseError| ConfigError::InvalidHost {
                host: self.host.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key.to_string())),
    }
}

/// Failures encountered while reading configuration from the environment.
#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    InvalidPort(String),
    InvalidHost { host: String, source: AddrParseError },
    NotUnicode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEnvironment(value) => {
                write!(f, "'{value}' is not a recognised environment")
            }
            ConfigError::InvalidPort(value) => write!(f, "'{value}' is not a valid port"),
            ConfigError::InvalidHost { host, .. } => write!(f, "'{host}' is not a valid host"),
            ConfigError::NotUnicode(key) => {
                write!(f, "environment variable '{key}' is not valid unicode")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            _ => None,
        }
    }
}
