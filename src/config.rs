use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api_keys: Vec<ApiKeyConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://warehouse-rates.db".to_string(),
        }
    }
}

/// Caller role attached to an API key.
///
/// Admin sees the full occupant-cost report and the rate table; supporter
/// sees the lighter users-and-costs report. Both can request quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supporter,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiKeyConfig {
    pub key: String,
    pub name: String,
    pub role: Role,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

/// Load configuration from config.toml (optional) with a
/// WAREHOUSE_RATES__-prefixed environment overlay.
pub fn load_config() -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("WAREHOUSE_RATES").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.api_keys.is_empty() {
        anyhow::bail!("At least one API key must be configured");
    }

    for key in &cfg.api_keys {
        if key.name.is_empty() {
            anyhow::bail!("API key name cannot be empty");
        }
        if key.key.is_empty() {
            anyhow::bail!("API key '{}' has an empty key", key.name);
        }
    }

    if cfg.database.url.is_empty() {
        anyhow::bail!("Database URL cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn create_test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                log_level: "info".to_string(),
                log_format: "json".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://test.db".to_string(),
            },
            api_keys: vec![
                ApiKeyConfig {
                    key: "wr-admin-001".to_string(),
                    name: "admin".to_string(),
                    role: Role::Admin,
                    enabled: true,
                },
                ApiKeyConfig {
                    key: "wr-support-001".to_string(),
                    name: "support-desk".to_string(),
                    role: Role::Supporter,
                    enabled: true,
                },
            ],
            metrics: MetricsConfig::default(),
        }
    }

    #[test]
    fn test_validate_config_requires_api_keys() {
        let mut cfg = create_test_config();
        cfg.api_keys.clear();

        let result = validate_config(&cfg);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("At least one API key must be configured"));
    }

    #[test]
    fn test_validate_config_rejects_unnamed_keys() {
        let mut cfg = create_test_config();
        cfg.api_keys[0].name.clear();

        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_config_rejects_empty_database_url() {
        let mut cfg = create_test_config();
        cfg.database.url.clear();

        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&create_test_config()).is_ok());
    }

    #[test]
    fn test_role_parses_lowercase() {
        let parsed: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(parsed, Role::Admin);
        let parsed: Role = serde_json::from_str(r#""supporter""#).unwrap();
        assert_eq!(parsed, Role::Supporter);
    }
}
