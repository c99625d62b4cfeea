mod loader;
pub mod value;

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;

pub use value::{ConfigValue, FromConfigValue};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
    /// A structured section did not match the expected layout.
    Invalid { key: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid config section '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from YAML files, `.env` files, and environment variables.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override)
/// 3. `.env` file (loaded into process environment)
/// 4. `.env.{profile}` file (loaded into process environment)
/// 5. Environment variables (e.g., `OPENAPI_TITLE` overrides `openapi.title`)
///
/// `.env` files never overwrite already-set environment variables.
///
/// Profile is determined by: `SHAPEDOC_PROFILE` env var > argument.
#[derive(Debug, Clone)]
pub struct AppConfig {
    values: HashMap<String, ConfigValue>,
    profile: String,
}

impl AppConfig {
    /// Load configuration for the given profile from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."), profile)
    }

    /// Load configuration for the given profile, looking for the YAML and
    /// `.env` files in `dir`.
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let active_profile =
            std::env::var("SHAPEDOC_PROFILE").unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();

        loader::load_yaml_file(&dir.join("application.yaml"), &mut values)?;
        loader::load_yaml_file(
            &dir.join(format!("application-{active_profile}.yaml")),
            &mut values,
        )?;

        // Missing .env files are fine.
        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        // `openapi.title` <-> `OPENAPI_TITLE`
        for (env_key, env_val) in std::env::vars() {
            let config_key = env_key.to_lowercase().replace('_', ".");
            values.insert(config_key, ConfigValue::String(env_val));
        }

        tracing::debug!(profile = %active_profile, keys = values.len(), "configuration loaded");
        Ok(AppConfig {
            values,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string (useful for testing).
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(AppConfig {
            values,
            profile: profile.to_string(),
        })
    }

    /// Create an empty config (useful for testing).
    pub fn empty() -> Self {
        AppConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    /// Set a value programmatically.
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Get a typed value for the given dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the key does not exist, or
    /// `ConfigError::TypeMismatch` if the value cannot be converted.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Get a typed value, returning a default if the key is missing.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Deserialize a structured section (a list or mapping) through serde.
    pub fn get_section<V: DeserializeOwned>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        serde_json::from_value(value.to_json()).map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Check whether a key exists in the config.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether the key exists and holds an explicit `null`.
    pub fn is_null(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(ConfigValue::Null))
    }

    /// The active profile name.
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
app:
  name: petstore
openapi:
  title: Pets
  casing: true
  redoc: ~
  tags:
    - name: pets
      description: Pet operations
"#;

    #[test]
    fn scalars_are_flattened() {
        let config = AppConfig::from_yaml_str(YAML, "dev").unwrap();
        assert_eq!(config.get::<String>("app.name").unwrap(), "petstore");
        assert!(config.get::<bool>("openapi.casing").unwrap());
        assert_eq!(config.profile(), "dev");
    }

    #[test]
    fn null_is_distinguished_from_missing() {
        let config = AppConfig::from_yaml_str(YAML, "dev").unwrap();
        assert!(config.is_null("openapi.redoc"));
        assert!(!config.contains_key("openapi.swagger"));
        assert_eq!(config.get::<Option<String>>("openapi.redoc").unwrap(), None);
    }

    #[test]
    fn sections_deserialize_through_serde() {
        #[derive(Debug, serde::Deserialize)]
        struct Tag {
            name: String,
            description: String,
        }

        let config = AppConfig::from_yaml_str(YAML, "dev").unwrap();
        let tags: Vec<Tag> = config.get_section("openapi.tags").unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "pets");
        assert_eq!(tags[0].description, "Pet operations");

        let err = config.get_section::<Vec<Tag>>("openapi.title").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn missing_key_and_mismatch() {
        let mut config = AppConfig::empty();
        assert!(matches!(
            config.get::<String>("nope"),
            Err(ConfigError::NotFound(_))
        ));
        config.set("port", ConfigValue::String("abc".into()));
        assert!(matches!(
            config.get::<i64>("port"),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert_eq!(config.get_or("other", 7i64), 7);
    }
}
