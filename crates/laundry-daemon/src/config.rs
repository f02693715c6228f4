//! Configuration for laundry-daemon

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Event relay configuration
    #[serde(default)]
    pub events: EventsConfig,

    /// Bearer token authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Note numbering
    #[serde(default)]
    pub notes: NotesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage
    #[default]
    Memory,
}

/// Event relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Broadcast channel capacity; slower subscribers are told they lagged
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Events kept for `GET /api/events`
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// SSE keep-alive interval in seconds
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            history_limit: default_history_limit(),
            keep_alive_secs: default_keep_alive(),
        }
    }
}

/// Authentication configuration. With no tokens the API is open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl AuthConfig {
    pub fn enabled(&self) -> bool {
        !self.tokens.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Folio prefix, e.g. `N` gives `N-00001`
    #[serde(default = "default_folio_prefix")]
    pub folio_prefix: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            folio_prefix: default_folio_prefix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8080))
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_history_limit() -> usize {
    500
}

fn default_keep_alive() -> u64 {
    15
}

fn default_folio_prefix() -> String {
    "N".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file and `LAUNDRY_*`
    /// environment variables, in that order
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // LAUNDRY_SERVER__LISTEN_ADDR, LAUNDRY_AUTH__TOKENS=a,b
        builder = builder.add_source(
            config::Environment::with_prefix("LAUNDRY")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.tokens")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
