//! Unified path management for posemaster configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/posemaster/        # Config directory
//! └── secret.json              # Gemini API key
//!
//! ~/Pictures/posemaster/       # Default export directory
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "posemaster";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolution rooted either at the platform config directory or at an
/// explicit base directory (used by tests and `--config-dir`).
#[derive(Debug, Clone, Default)]
pub struct PoseMasterPaths {
    base: Option<PathBuf>,
}

impl PoseMasterPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the posemaster configuration directory.
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/posemaster/`
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Default directory for exported images.
    ///
    /// Falls back to `<config_dir>/exports` when the platform has no picture
    /// directory.
    pub fn export_dir(&self) -> Result<PathBuf, PathError> {
        if self.base.is_none() {
            if let Some(pictures) = dirs::picture_dir() {
                return Ok(pictures.join(APP_DIR_NAME));
            }
        }
        Ok(self.config_dir()?.join("exports"))
    }

    /// Ensures the secret file exists, creating an empty template if it doesn't.
    ///
    /// Sets file permissions to 600 (user read/write only) on Unix systems.
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        use posemaster_core::config::{GeminiConfig, SecretConfig};

        let template_config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
