//! Application configuration.
//!
//! A TOML file under the user configuration directory, written with
//! defaults on first run and overridable through `ESTOQUE_`-prefixed
//! environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::inventory::ZeroPolicy;

/// Directory under the platform config root.
pub const CONFIG_DIR: &str = "estoque";
/// File name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG_TOML: &str = "\
# estoque configuration

# Accept items with zero price or quantity. Set to false to require
# strictly positive values.
allow_zero = true

# Jump to the list screen after a successful registration instead of
# staying on the form.
navigate_after_register = false

# Optional log file path. Defaults to ./logs/estoque.log when unset.
# log_file = \"/tmp/estoque.log\"
";

/// Runtime settings for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Accept zero price/quantity (the later-revision policy).
    pub allow_zero: bool,
    /// Navigate to the list screen after a successful registration.
    pub navigate_after_register: bool,
    /// Log file appended by the TUI, if set.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allow_zero: true,
            navigate_after_register: false,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Default config file location.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    }

    /// Load settings from the default location plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load settings from an explicit file path. A missing file yields the
    /// defaults; environment variables still apply.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("ESTOQUE").try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .context("invalid configuration values")?;
        Ok(config)
    }

    /// Zero policy implied by [`AppConfig::allow_zero`].
    pub fn zero_policy(&self) -> ZeroPolicy {
        if self.allow_zero {
            ZeroPolicy::Allow
        } else {
            ZeroPolicy::Reject
        }
    }
}

/// Write the commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = AppConfig::path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Like [`ensure_default_config`] but targeting an explicit path.
pub fn ensure_default_config_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Default configuration written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(&dir.path().join("config.toml"))?;
        assert!(config.allow_zero);
        assert!(!config.navigate_after_register);
        assert!(config.log_file.is_none());
        assert_eq!(config.zero_policy(), ZeroPolicy::Allow);
        Ok(())
    }

    #[test]
    fn default_file_is_written_once_and_parses() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        ensure_default_config_at(&path)?;
        assert!(path.exists());

        // A second call must not clobber user edits.
        fs::write(&path, "allow_zero = false\n")?;
        ensure_default_config_at(&path)?;
        let config = AppConfig::load_from(&path)?;
        assert!(!config.allow_zero);
        assert_eq!(config.zero_policy(), ZeroPolicy::Reject);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "allow_zero = false\nnavigate_after_register = true\nlog_file = \"/tmp/estoque-test.log\"\n",
        )?;
        let config = AppConfig::load_from(&path)?;
        assert!(!config.allow_zero);
        assert!(config.navigate_after_register);
        assert_eq!(
            config.log_file.as_deref(),
            Some(Path::new("/tmp/estoque-test.log"))
        );
        Ok(())
    }
}
