use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub chapa: ChapaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Connection details for the Chapa payment gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct ChapaConfig {
    #[serde(default = "default_chapa_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_return_url")]
    pub return_url: String,
    #[serde(default = "default_callback_url")]
    pub callback_url: String,
    /// Upper bound on a single outbound gateway call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chapa_base_url() -> String {
    "https://api.chapa.co/v1".to_string()
}

fn default_return_url() -> String {
    "http://localhost:8080/payments/complete".to_string()
}

fn default_callback_url() -> String {
    "http://localhost:8080/payments/callback".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ChapaConfig {
    fn default() -> Self {
        Self {
            base_url: default_chapa_base_url(),
            secret_key: String::new(),
            return_url: default_return_url(),
            callback_url: default_callback_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://staybook.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("chapa.timeout_secs", 30)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with STAYBOOK__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("STAYBOOK").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://staybook.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            chapa: ChapaConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapa_defaults() {
        let cfg = ChapaConfig::default();
        assert_eq!(cfg.base_url, "https://api.chapa.co/v1");
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.secret_key.is_empty());
    }

    #[test]
    fn test_chapa_section_deserializes_with_partial_fields() {
        let cfg: ChapaConfig = serde_json::from_value(serde_json::json!({
            "secret_key": "CHASECK_TEST-abc",
        }))
        .unwrap();
        assert_eq!(cfg.secret_key, "CHASECK_TEST-abc");
        assert_eq!(cfg.return_url, "http://localhost:8080/payments/complete");
    }
}
