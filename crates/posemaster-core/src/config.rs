//! Configuration types.

use serde::{Deserialize, Serialize};

/// Contents of `secret.json`.
///
/// The only credential the application needs is the Gemini API key.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SecretConfig {
    /// Returns the Gemini API key if one is configured and non-blank.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|config| config.api_key.trim())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_treated_as_missing() {
        let config: SecretConfig = serde_json::from_str(r#"{"gemini":{"api_key":"  "}}"#).unwrap();
        assert_eq!(config.gemini_api_key(), None);

        let empty: SecretConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.gemini_api_key(), None);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: "super-secret".to_string(),
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
