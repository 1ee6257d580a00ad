use finecheck::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Conventional variables honoured as defaults, below file and `FINECHECK_*`.
const CONVENTIONAL_ENV: &[(&str, &str)] = &[
    ("port", "PORT"),
    ("environment", "APP_ENV"),
    ("provider.api_key", "OPENAI_API_KEY"),
];

/// Deployment mode. Controls whether internal error detail reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev", alias = "Development")]
    Development,
    #[serde(alias = "prod", alias = "Production")]
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Development echoes error details to clients, production does not
    #[serde(default)]
    pub environment: Environment,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum fine image upload size in MB
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level or full `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            environment: Environment::default(),
            timeout_secs: default_timeout_secs(),
            max_upload_mb: default_max_upload_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            provider: ProviderConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `finecheck` config file and
    /// environment variables (`FINECHECK_PORT`, `FINECHECK_PROVIDER__MODEL`, ...).
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        for (key, var) in CONVENTIONAL_ENV {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_default(*key, value)?;
            }
        }

        let builder = builder
            // Load from file if exists
            .add_source(config::File::with_name("finecheck").required(false))
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("FINECHECK")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be >= 1");
        }
        if self.max_upload_mb == 0 {
            anyhow::bail!("max_upload_mb must be >= 1");
        }
        self.provider.validate()?;
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max upload size in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn expose_error_details(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timeout_secs() -> u64 {
    90
}

fn default_max_upload_mb() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
