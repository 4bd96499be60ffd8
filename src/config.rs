use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub grocery: GroceryConfig,
    #[serde(default)]
    pub pantry: PantryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct GroceryConfig {
    /// Leave out ingredients the pantry already covers unless asked otherwise
    #[serde(default = "default_exclude_pantry_items")]
    pub exclude_pantry_items_by_default: bool,
}

impl Default for GroceryConfig {
    fn default() -> Self {
        Self {
            exclude_pantry_items_by_default: default_exclude_pantry_items(),
        }
    }
}

fn default_exclude_pantry_items() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct PantryConfig {
    #[serde(default = "default_expiring_within_days")]
    pub expiring_within_days: u32,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            expiring_within_days: default_expiring_within_days(),
        }
    }
}

fn default_expiring_within_days() -> u32 {
    7
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. `DATABASE_URL`
    /// 2. Environment variables (MEALBUDDY__DATABASE__URL, etc.)
    /// 3. Config file specified by path, `CONFIG_PATH` or `config/default.toml`
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("database.url", "sqlite://mealbuddy.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // The file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALBUDDY")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config(url: &str, max_connections: u32) -> Config {
        Config {
            database: DatabaseConfig {
                url: url.to_string(),
                max_connections,
            },
            observability: ObservabilityConfig::default(),
            grocery: GroceryConfig::default(),
            pantry: PantryConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config("sqlite://test.db", 5).validate().is_ok());
    }

    #[test]
    fn test_validation_zero_connections() {
        assert!(config("sqlite://test.db", 0).validate().is_err());
    }

    #[test]
    fn test_validation_empty_url() {
        assert!(config("  ", 5).validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp config");
        writeln!(
            file,
            r#"
[database]
url = "sqlite://from-file.db"
max_connections = 2

[grocery]
exclude_pantry_items_by_default = false

[pantry]
expiring_within_days = 3
"#
        )
        .expect("Failed to write temp config");

        let config = Config::load(Some(file.path().to_string_lossy().into_owned()))
            .expect("Failed to load config");

        // DATABASE_URL may be set in the environment running the tests
        if env::var("DATABASE_URL").is_err() {
            assert_eq!(config.database.url, "sqlite://from-file.db");
        }
        assert!(!config.grocery.exclude_pantry_items_by_default);
        assert_eq!(config.pantry.expiring_within_days, 3);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load(Some("does/not/exist.toml".to_string()))
            .expect("Failed to load default config");

        assert!(config.grocery.exclude_pantry_items_by_default);
        assert_eq!(config.pantry.expiring_within_days, 7);
        assert!(config.validate().is_ok());
    }
}
