//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Hospital data feed published on data.gouv.fr
pub const DEFAULT_CSV_URL: &str =
    "https://www.data.gouv.fr/fr/datasets/r/63352e38-d353-4b54-bfd1-f1b3ee1cabd7";

/// Dataset landing page, linked from the dashboard
pub const DATA_SOURCE_PAGE: &str =
    "https://www.data.gouv.fr/fr/datasets/donnees-hospitalieres-relatives-a-lepidemie-de-covid-19/";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// URL or local path of the semicolon-delimited hospital CSV
    #[serde(default = "default_csv_url")]
    pub csv_url: String,

    /// Path (or URL) of the department GeoJSON FeatureCollection
    #[serde(default = "default_geojson_path")]
    pub geojson_path: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_csv_url() -> String {
    DEFAULT_CSV_URL.to_string()
}

fn default_geojson_path() -> String {
    "geoJson/map.json".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            csv_url: default_csv_url(),
            geojson_path: default_geojson_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn filter_directive(&self) -> String {
        format!("hospimap={},tower_http={}", self.level, self.level)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("hospimap").join("config.toml")),
            Some(PathBuf::from("/etc/hospimap/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Source overrides
        if let Some(url) = lookup("HOSPIMAP_CSV_URL") {
            self.source.csv_url = url;
        }
        if let Some(path) = lookup("HOSPIMAP_GEOJSON_PATH") {
            self.source.geojson_path = path;
        }

        // API overrides
        if let Some(host) = lookup("HOSPIMAP_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("HOSPIMAP_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid HOSPIMAP_API_PORT: {}", port),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("HOSPIMAP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("HOSPIMAP_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Hospimap Configuration
#
# Environment variables override these settings:
# - HOSPIMAP_CSV_URL
# - HOSPIMAP_GEOJSON_PATH
# - HOSPIMAP_API_HOST
# - HOSPIMAP_API_PORT
# - HOSPIMAP_LOG_LEVEL
# - HOSPIMAP_LOG_FORMAT

[source]
# Hospital data CSV (URL or local path, semicolon-delimited)
csv_url = "{}"

# Department boundaries (GeoJSON FeatureCollection with properties.code / properties.nom)
geojson_path = "geoJson/map.json"

# Timeout for fetching remote sources (seconds)
request_timeout_secs = 60

[api]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 8050

# Allowed CORS origins (empty = any)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        DEFAULT_CSV_URL
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.source.csv_url, DEFAULT_CSV_URL);
        assert_eq!(config.source.geojson_path, "geoJson/map.json");
        assert_eq!(config.api.addr(), "0.0.0.0:8050");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();

        assert_eq!(config.source.csv_url, DEFAULT_CSV_URL);
        assert_eq!(config.source.request_timeout_secs, 60);
        assert_eq!(config.api.port, 8050);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[api]\nport = 9000\n").unwrap();

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.source.geojson_path, "geoJson/map.json");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("HOSPIMAP_CSV_URL", "data/donnees-hospitalieres.csv"),
            ("HOSPIMAP_API_PORT", "9100"),
            ("HOSPIMAP_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.source.csv_url, "data/donnees-hospitalieres.csv");
        assert_eq!(config.api.port, 9100);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "HOSPIMAP_API_PORT").then(|| "http".to_string()));

        assert_eq!(config.api.port, 8050);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[source]\ngeojson_path = \"/srv/map.json\"\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source.geojson_path, "/srv/map.json");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/hospimap.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_filter_directive() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        assert_eq!(logging.filter_directive(), "hospimap=debug,tower_http=debug");
    }
}
