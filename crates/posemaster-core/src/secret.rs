//! Secret management service trait.
//!
//! Defines the interface for loading the service credential.

use crate::config::SecretConfig;
use crate::error::{PoseMasterError, Result};

/// Service for loading secret configuration.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Returns the Gemini API key or a `Config` error if none is configured.
    async fn gemini_api_key(&self) -> Result<String> {
        let secrets = self.load_secrets().await?;
        secrets
            .gemini_api_key()
            .map(str::to_string)
            .ok_or_else(|| PoseMasterError::config("Gemini API key not found"))
    }
}
