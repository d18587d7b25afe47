use crate::catalog::CategoryCatalog;
use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub forecast: ForecastSettings,
    pub logging: LoggingSettings,
    /// Crime categories accepted by `/new-data`, with their weights.
    pub categories: CategoryCatalog,
}

/// Where and how the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    /// Maximum accepted request body, in bytes.
    pub body_limit: usize,
}

/// Connection pool tuning. The URL itself comes from `DATABASE_URL`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Parameters of the forecast adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Probability mass covered by `[yhat_lower, yhat_upper]`, e.g. 0.8.
    pub interval_width: f64,
    /// Upper limit on `n_steps` accepted by `/predict`.
    pub max_steps: usize,
    /// Upper limit on the number of buckets a fitted history may span,
    /// gaps included.
    pub max_history: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// When set, logs are also written to a daily-rolling file here.
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            body_limit: 1024 * 1024,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            interval_width: 0.8,
            max_steps: 104,
            max_history: 2600,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "foresee.log".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Settings {
    /// Rejects values that would make the service misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.forecast.interval_width;
        if !(width > 0.0 && width < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "forecast.interval_width must be in (0, 1), got {width}"
            )));
        }
        if self.forecast.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "forecast.max_steps must be at least 1".to_string(),
            ));
        }
        if self.forecast.max_history == 0 {
            return Err(ConfigError::ValidationError(
                "forecast.max_history must be at least 1".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        self.categories.validate()
    }

    pub fn apply_overrides(&mut self, overrides: &ServerOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }
}

/// Command-line overrides for the listening address.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ServerOverrides {
    /// Address to bind, overrides `server.host`.
    #[cfg_attr(feature = "clap", arg(long))]
    pub host: Option<IpAddr>,
    /// Port to bind, overrides `server.port`.
    #[cfg_attr(feature = "clap", arg(long))]
    pub port: Option<u16>,
}
