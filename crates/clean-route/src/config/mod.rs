use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::planning::DEFAULT_SCORING_TIMEOUT;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_ROUTER_URL: &str = "https://router.project-osrm.org";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub collaborators: CollaboratorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            collaborators: CollaboratorConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Endpoints of the geocoding, routing and scoring collaborators.
#[derive(Debug, Clone)]
pub struct CollaboratorConfig {
    pub geocoder_url: String,
    pub router_url: String,
    /// `None` disables remote scoring; every pass then uses the local formulas.
    pub scoring_url: Option<String>,
    pub scoring_timeout: Duration,
    pub user_agent: String,
}

impl CollaboratorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let geocoder_url = url_var("GEOCODER_URL")?
            .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string());
        let router_url =
            url_var("ROUTER_URL")?.unwrap_or_else(|| DEFAULT_ROUTER_URL.to_string());
        let scoring_url = url_var("SCORING_URL")?;

        let scoring_timeout = match env::var("SCORING_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| ConfigError::InvalidTimeout { value: raw.clone() })?,
            Err(_) => DEFAULT_SCORING_TIMEOUT,
        };

        let user_agent = env::var("HTTP_USER_AGENT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(default_user_agent);

        Ok(Self {
            geocoder_url,
            router_url,
            scoring_url,
            scoring_timeout,
            user_agent,
        })
    }
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            router_url: DEFAULT_ROUTER_URL.to_string(),
            scoring_url: None,
            scoring_timeout: DEFAULT_SCORING_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("clean-route/{}", env!("CARGO_PKG_VERSION"))
}

/// Read an optional URL variable; blank counts as unset.
fn url_var(name: &'static str) -> Result<Option<String>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };

    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl {
            name,
            value: value.to_string(),
        });
    }

    Ok(Some(value.trim_end_matches('/').to_string()))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout { value: String },
    InvalidUrl { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "SCORING_TIMEOUT_MS must be a positive number of milliseconds, got '{value}'"
            ),
            ConfigError::InvalidUrl { name, value } => {
                write!(f, "{name} must be an http(s) URL, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout { .. }
            | ConfigError::InvalidUrl { .. } => None,
        }
    }
}
