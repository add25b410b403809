// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the diet tracker

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{defaults, env_config};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub recipe_api: RecipeApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecipeApiConfig {
    /// Provider name understood by [`crate::providers::create_provider`]
    pub provider: String,
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub database_url: String,
}

fn default_timeout_seconds() -> u64 {
    env_config::recipe_api_timeout_secs()
}

impl Default for RecipeApiConfig {
    fn default() -> Self {
        Self {
            provider: env_config::recipe_api_provider(),
            base_url: env_config::recipe_api_base(),
            api_key: env_config::recipe_api_key(),
            timeout_seconds: env_config::recipe_api_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: env_config::database_url(),
        }
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join(defaults::CONFIG_DIR_NAME).join(defaults::CONFIG_FILE_NAME))
        .unwrap_or_else(|| defaults::CONFIG_FILE_NAME.into())
}

impl Config {
    /// Load from the given TOML file, the user config dir, or the environment
    ///
    /// `RECIPE_API_KEY` takes precedence over a key stored in the file.
    pub fn load(path: Option<String>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).unwrap_or_else(default_config_path);
        dotenv::dotenv().ok();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            Self::parse(&content, env_config::recipe_api_key())
        } else {
            Ok(Config {
                recipe_api: RecipeApiConfig::default(),
                storage: StorageConfig::default(),
            })
        }
    }

    fn parse(content: &str, env_api_key: Option<String>) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .context("Failed to parse config file")?;
        if env_api_key.is_some() {
            config.recipe_api.api_key = env_api_key;
        }
        Ok(config)
    }

    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

        let parent = Path::new(&config_path).parent()
            .context("Invalid config path")?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }

    /// Whether live API calls can be attempted at all
    pub fn has_api_key(&self) -> bool {
        self.recipe_api
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Helper function to create a sample config
    fn create_sample_config() -> Config {
        Config {
            recipe_api: RecipeApiConfig {
                provider: "spoonacular".to_string(),
                base_url: "https://api.example.test".to_string(),
                api_key: Some("test_api_key".to_string()),
                timeout_seconds: 5,
            },
            storage: StorageConfig {
                database_url: "sqlite::memory:".to_string(),
            },
        }
    }

    /// Helper function to create a temporary config file
    fn create_temp_config_file(content: &str) -> (TempDir, String) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).expect("Failed to write temp config");
        (temp_dir, config_path.to_string_lossy().to_string())
    }

    #[test]
    fn test_config_serialization() {
        let config = create_sample_config();

        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize config");
        assert!(toml_str.contains("[recipe_api]"));
        assert!(toml_str.contains("spoonacular"));
        assert!(toml_str.contains("sqlite::memory:"));

        let deserialized: Config = toml::from_str(&toml_str).expect("Failed to deserialize config");
        assert_eq!(deserialized.recipe_api.base_url, config.recipe_api.base_url);
        assert_eq!(deserialized.recipe_api.api_key, config.recipe_api.api_key);
        assert_eq!(deserialized.recipe_api.timeout_seconds, 5);
    }

    const FILE_CONFIG: &str = r#"
[recipe_api]
provider = "spoonacular"
base_url = "https://file.example.test"
api_key = "file_key"
timeout_seconds = 3

[storage]
database_url = "sqlite:./file.db"
"#;

    #[test]
    fn test_config_load_from_file() {
        let (_temp_dir, config_path) = create_temp_config_file(FILE_CONFIG);

        let config = Config::load(Some(config_path)).expect("Failed to load config");

        assert_eq!(config.recipe_api.base_url, "https://file.example.test");
        assert_eq!(config.recipe_api.timeout_seconds, 3);
        assert_eq!(config.storage.database_url, "sqlite:./file.db");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_file_api_key_used_without_env_key() {
        let config = Config::parse(FILE_CONFIG, None).expect("Failed to parse config");
        assert_eq!(config.recipe_api.api_key, Some("file_key".to_string()));
    }

    #[test]
    fn test_env_api_key_overrides_file_key() {
        let config = Config::parse(FILE_CONFIG, Some("env_key".to_string()))
            .expect("Failed to parse config");
        assert_eq!(config.recipe_api.api_key, Some("env_key".to_string()));
        assert_eq!(config.recipe_api.base_url, "https://file.example.test");
    }

    #[test]
    fn test_config_without_key_has_no_api_key() {
        let config_content = r#"
[recipe_api]
provider = "demo"
base_url = "https://file.example.test"
"#;
        let config = Config::parse(config_content, None).expect("Failed to parse config");
        assert_eq!(config.recipe_api.provider, "demo");
        assert!(config.recipe_api.api_key.is_none());
        assert!(!config.has_api_key());

        let config = Config::parse(config_content, Some("env_key".to_string()))
            .expect("Failed to parse config");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let invalid_toml = "this is not valid toml [[[";
        let (_temp_dir, config_path) = create_temp_config_file(invalid_toml);

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_save_creates_directory() {
        let config = create_sample_config();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested_path = temp_dir.path().join("nested").join("directory").join("config.toml");
        let nested_path_str = nested_path.to_string_lossy().to_string();

        config.save(Some(nested_path_str.clone())).expect("Failed to save config with nested path");

        assert!(nested_path.exists());

        let loaded_config = Config::load(Some(nested_path_str)).expect("Failed to load saved config");
        assert_eq!(loaded_config.recipe_api.provider, config.recipe_api.provider);
        assert_eq!(loaded_config.storage.database_url, config.storage.database_url);
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let mut config = create_sample_config();
        config.recipe_api.api_key = Some("   ".to_string());
        assert!(!config.has_api_key());
    }
}
