use crate::core::currency::CurrencyCode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Guest".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AdvisorConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
        }
    }
}

impl AdvisorConfig {
    /// The configured key, or the one from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Like [`Self::resolved_api_key`], reading variables through `lookup`.
    pub fn api_key_with(&self, lookup: impl FnOnce(&str) -> Option<String>) -> Option<String> {
        let usable = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(usable)
            .or_else(|| lookup(API_KEY_ENV).filter(usable))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub privacy_mode: bool,
    pub data_path: Option<String>,
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("app", "moneymaster", "moneymaster")
        .context("Could not determine project directories")
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    /// Directory holding the ledger database.
    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Loads the config at `path` (or the default location), falling back to
    /// defaults when no file exists there. A file that exists but does not
    /// parse is still an error.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
profile:
  name: "Alex"
currency: "INR"
privacy_mode: true
data_path: "/tmp/moneymaster"
advisor:
  base_url: "http://localhost:9999"
  model: "gemini-test"
  api_key: "secret"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.profile.name, "Alex");
        assert_eq!(config.currency, CurrencyCode::INR);
        assert!(config.privacy_mode);
        assert_eq!(
            config.data_path().unwrap(),
            PathBuf::from("/tmp/moneymaster")
        );
        assert_eq!(config.advisor.base_url, "http://localhost:9999");
        assert_eq!(config.advisor.model, "gemini-test");
        assert_eq!(config.advisor.resolved_api_key().as_deref(), Some("secret"));
    }

    #[test]
    fn test_api_key_falls_back_to_environment() {
        let blank = AdvisorConfig {
            api_key: Some("  ".to_string()),
            ..AdvisorConfig::default()
        };
        let from_env = |name: &str| {
            assert_eq!(name, API_KEY_ENV);
            Some("env-key".to_string())
        };
        assert_eq!(blank.api_key_with(from_env).as_deref(), Some("env-key"));
        assert_eq!(blank.api_key_with(|_| None), None);
        assert_eq!(blank.api_key_with(|_| Some(String::new())), None);

        let configured = AdvisorConfig {
            api_key: Some("secret".to_string()),
            ..AdvisorConfig::default()
        };
        assert_eq!(
            configured.api_key_with(|_| Some("env-key".to_string())).as_deref(),
            Some("secret")
        );
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("currency: EUR\n").unwrap();
        assert_eq!(config.currency, CurrencyCode::EUR);
        assert_eq!(config.profile.name, "Guest");
        assert!(!config.privacy_mode);
        assert!(config.data_path.is_none());
        assert_eq!(config.advisor, AdvisorConfig::default());
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("currency: XYZ\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let missing = temp_dir.path().join("missing.yaml");
        let config = AppConfig::load_or_default(missing.to_str())?;
        assert_eq!(config, AppConfig::default());

        let present = temp_dir.path().join("config.yaml");
        fs::write(&present, "profile:\n  name: Sam\ncurrency: GBP\n")?;
        let config = AppConfig::load_or_default(present.to_str())?;
        assert_eq!(config.profile.name, "Sam");
        assert_eq!(config.currency, CurrencyCode::GBP);

        let broken = temp_dir.path().join("broken.yaml");
        fs::write(&broken, "currency: [")?;
        let err = AppConfig::load_or_default(broken.to_str()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }
}
