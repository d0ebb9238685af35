//! Secret service implementation.
//!
//! The Gemini API key is read from the environment (`GEMINI_API_KEY`, then
//! `API_KEY`) and, failing that, from `secret.json` in the config directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use posemaster_core::config::{GeminiConfig, SecretConfig};
use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::secret::SecretService;
use tokio::sync::RwLock;

use crate::paths::PoseMasterPaths;

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Service for loading the secret configuration.
///
/// The loaded configuration is cached to avoid repeated file I/O.
///
/// # Example
///
/// ```ignore
/// use posemaster_infrastructure::SecretServiceImpl;
/// use posemaster_core::secret::SecretService;
///
/// let service = SecretServiceImpl::new(None)?;
/// let api_key = service.gemini_api_key().await?;
/// ```
#[derive(Clone)]
pub struct SecretServiceImpl {
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    secret_file: PathBuf,
    env_vars: Vec<&'static str>,
}

impl SecretServiceImpl {
    /// Creates a service reading the environment and then `secret.json`
    /// under `base_path` (or the platform config directory).
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let secret_file = PoseMasterPaths::new(base_path)
            .secret_file()
            .map_err(|e| PoseMasterError::config(format!("Failed to get secret path: {e}")))?;

        Ok(Self {
            secrets: Arc::new(RwLock::new(None)),
            secret_file,
            env_vars: API_KEY_ENV_VARS.to_vec(),
        })
    }

    /// Creates a service that only reads the given file.
    pub fn from_file(secret_file: impl Into<PathBuf>) -> Self {
        Self {
            secrets: Arc::new(RwLock::new(None)),
            secret_file: secret_file.into(),
            env_vars: Vec::new(),
        }
    }

    pub fn secret_file(&self) -> &Path {
        &self.secret_file
    }

    fn from_env(&self) -> Option<SecretConfig> {
        self.env_vars.iter().find_map(|name| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|api_key| SecretConfig {
                    gemini: Some(GeminiConfig { api_key }),
                })
        })
    }

    async fn from_file_contents(&self) -> Result<SecretConfig> {
        if !tokio::fs::try_exists(&self.secret_file).await? {
            tracing::debug!("Secret file {:?} does not exist", self.secret_file);
            return Ok(SecretConfig::default());
        }
        let content = tokio::fs::read_to_string(&self.secret_file).await?;
        let config = serde_json::from_str(&content).map_err(|e| {
            PoseMasterError::config(format!(
                "Failed to parse {}: {e}",
                self.secret_file.display()
            ))
        })?;
        Ok(config)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        {
            let cached = self.secrets.read().await;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = match self.from_env() {
            Some(config) => {
                tracing::debug!("Loaded Gemini API key from environment");
                config
            }
            None => self.from_file_contents().await?,
        };

        // A config without a key is not cached so a key added later is picked up.
        if loaded.gemini_api_key().is_some() {
            let mut cache = self.secrets.write().await;
            *cache = Some(loaded.clone());
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loads_key_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini":{"api_key":"file-key"}}"#).unwrap();

        let service = SecretServiceImpl::from_file(&path);
        assert_eq!(service.gemini_api_key().await.unwrap(), "file-key");
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let service = SecretServiceImpl::from_file(temp_dir.path().join("secret.json"));

        let err = service.gemini_api_key().await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_invalid_json_is_config_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, "not json").unwrap();

        let service = SecretServiceImpl::from_file(&path);
        assert!(service.load_secrets().await.unwrap_err().is_config());
    }

    #[tokio::test]
    async fn test_secrets_are_cached() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini":{"api_key":"first"}}"#).unwrap();

        let service = SecretServiceImpl::from_file(&path);
        assert_eq!(service.gemini_api_key().await.unwrap(), "first");

        std::fs::write(&path, r#"{"gemini":{"api_key":"second"}}"#).unwrap();
        assert_eq!(service.gemini_api_key().await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_key_written_after_failed_lookup_is_found() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        let service = SecretServiceImpl::from_file(&path);

        assert!(service.gemini_api_key().await.unwrap_err().is_config());

        std::fs::write(&path, r#"{"gemini":{"api_key":""}}"#).unwrap();
        assert!(service.gemini_api_key().await.unwrap_err().is_config());

        std::fs::write(&path, r#"{"gemini":{"api_key":"now-set"}}"#).unwrap();
        assert_eq!(service.gemini_api_key().await.unwrap(), "now-set");
    }

    #[test]
    fn test_new_resolves_secret_file_under_base() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let service = SecretServiceImpl::new(Some(temp_dir.path())).unwrap();
        assert_eq!(service.secret_file(), temp_dir.path().join("secret.json"));
    }
}
