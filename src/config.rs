//! Configuration.
//!
//! [`FormConfig`] holds the per-form options. [`Config`] is the YAML file the
//! binary (and any host that wants one) loads with a fallback chain:
//! explicit path, `./.formcheck.yml`, `~/.config/formcheck/formcheck.yml`,
//! then defaults.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FormcheckError;
use crate::field::FieldSettings;
use crate::registry::{Registry, RegistryKind};

/// Per-form options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Message template kind to fall back to; `None` uses the registry default
    pub message_type: Option<String>,
    /// Message key to fall back to; `None` uses the registry default
    pub error_type: Option<String>,
    /// Verbose diagnostics for every validation pass
    pub debug: bool,
}

impl FormConfig {
    /// Set the fallback message template kind (builder pattern)
    pub fn with_message_type(mut self, kind: impl Into<String>) -> Self {
        self.message_type = Some(kind.into());
        self
    }

    /// Set the fallback message key (builder pattern)
    pub fn with_error_type(mut self, key: impl Into<String>) -> Self {
        self.error_type = Some(key.into());
        self
    }

    /// Enable verbose diagnostics (builder pattern)
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Resolve against a registry; configured keys must be registered
    pub fn resolve(&self, registry: &Registry) -> crate::Result<FieldSettings> {
        let error_type = match &self.error_type {
            Some(key) if !registry.contains_message(key) => {
                return Err(FormcheckError::MissingDefault {
                    kind: RegistryKind::Message,
                    key: key.clone(),
                });
            }
            Some(key) => key.clone(),
            None => registry.defaults().error_type.clone(),
        };

        let message_type = match &self.message_type {
            Some(kind) if !registry.contains_message_template(kind) => {
                return Err(FormcheckError::MissingDefault {
                    kind: RegistryKind::MessageTemplate,
                    key: kind.clone(),
                });
            }
            Some(kind) => kind.clone(),
            None => registry.defaults().message_type.clone(),
        };

        Ok(FieldSettings {
            error_type,
            message_type,
            debug: self.debug,
        })
    }
}

/// Settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    /// Defaults applied to every form
    pub form: FormConfig,
    /// Extra messages registered at bootstrap
    pub messages: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            form: FormConfig::default(),
            messages: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".formcheck.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load .formcheck.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Register the configured messages on a bootstrap-phase registry
    pub fn apply(&self, registry: &mut Registry) -> Result<()> {
        for (key, text) in &self.messages {
            registry
                .register_message(key.as_str(), text.as_str())
                .context(format!("Failed to register message '{}'", key))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sealed() -> Registry {
        let mut registry = Registry::with_builtins();
        registry.seal().unwrap();
        registry
    }

    #[test]
    fn test_form_config_defaults_resolve_to_registry() {
        let settings = FormConfig::default().resolve(&sealed()).unwrap();
        assert_eq!(settings.error_type, "generic");
        assert_eq!(settings.message_type, "note");
        assert!(!settings.debug);
    }

    #[test]
    fn test_form_config_overrides() {
        let config = FormConfig::default()
            .with_error_type("required")
            .with_message_type("error")
            .with_debug(true);
        let settings = config.resolve(&sealed()).unwrap();
        assert_eq!(settings.error_type, "required");
        assert_eq!(settings.message_type, "error");
        assert!(settings.debug);
    }

    #[test]
    fn test_form_config_unknown_error_type() {
        let err = FormConfig::default()
            .with_error_type("missing")
            .resolve(&sealed())
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_form_config_unknown_message_type() {
        let err = FormConfig::default()
            .with_message_type("toast")
            .resolve(&sealed())
            .unwrap_err();
        assert!(matches!(
            err,
            FormcheckError::MissingDefault {
                kind: RegistryKind::MessageTemplate,
                ..
            }
        ));
    }

    #[test]
    fn test_form_config_yaml() {
        let config: FormConfig = serde_yaml::from_str("debug: true\nerror_type: required").unwrap();
        assert!(config.debug);
        assert_eq!(config.error_type.as_deref(), Some("required"));
        assert_eq!(config.message_type, None);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("formcheck.yml");
        fs::write(
            &path,
            "log_level: debug\nform:\n  debug: true\nmessages:\n  postal: Enter a postal code\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.form.debug);
        assert_eq!(config.messages.get("postal").map(String::as_str), Some("Enter a postal code"));
    }

    #[test]
    fn test_load_from_missing_explicit_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_rejects_bad_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.yml");
        fs::write(&path, "form: [unclosed").unwrap();
        assert!(Config::load_from_file(&path).is_err());
    }

    #[test]
    fn test_apply_registers_messages() {
        let mut config = Config::default();
        config.messages.insert("postal".to_string(), "Enter a postal code".to_string());

        let mut registry = Registry::with_builtins();
        config.apply(&mut registry).unwrap();
        registry.seal().unwrap();
        assert_eq!(registry.resolve_message("postal"), "Enter a postal code");
    }

    #[test]
    fn test_apply_cannot_shadow_builtin() {
        let mut config = Config::default();
        config.messages.insert("required".to_string(), "Fill me in".to_string());

        let mut registry = Registry::with_builtins();
        assert!(config.apply(&mut registry).is_err());
        assert_eq!(registry.resolve_message("required"), "This field is required");
    }
}
