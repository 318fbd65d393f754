// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{EditorError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. CLI arguments (highest, applied by the caller)
    /// 2. Environment variables
    /// 3. Config file
    /// 4. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_config_path())
    }

    /// Same as [`AppConfig::load`] but reading an explicit config file path.
    pub fn load_from(path: &str) -> Result<Self> {
        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::with_name(path).required(false))
            // Override with environment variables (prefix: NANO_BANANA_, e.g. NANO_BANANA_SERVER__PORT)
            .add_source(
                Environment::with_prefix("NANO_BANANA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| EditorError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Fail early when no usable API key was supplied.
    pub fn require_api_key(&self) -> Result<&ApiKey> {
        match &self.gemini.api_key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(EditorError::Config(
                "Gemini API key missing: pass --api-key or set GEMINI_API_KEY".to_string(),
            )),
        }
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nano-banana")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9191\n\n[limits]\nmax_upload_bytes = 2048").unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.limits.max_upload_bytes, 2048);
        assert_eq!(config.gemini.model, DEFAULT_EDIT_MODEL);
    }

    #[test]
    fn test_require_api_key() {
        let mut config = AppConfig::default();
        assert!(config.require_api_key().is_err());

        config.gemini.api_key = Some(ApiKey::new("   "));
        assert!(config.require_api_key().is_err());

        config.gemini.api_key = Some(ApiKey::new("AIza-test"));
        assert_eq!(config.require_api_key().unwrap().expose(), "AIza-test");
    }
}
