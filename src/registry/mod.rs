//! Extensibility registry.
//!
//! One registry holds every named check, field-type adapter, message and
//! template. It has two phases: during bootstrap the host registers its own
//! entries next to the built-ins; [`Registry::seal`] then freezes it. All
//! tables are append-only, so a built-in can never be silently shadowed.
//!
//! A process-wide instance is published with [`install`] and read with
//! [`global`]. Forms can also be handed an explicit `Arc<Registry>`.

pub mod templates;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::adapter::FieldAdapter;
use crate::adapter::standard;
use crate::check::{CheckFn, FieldMeta, FieldValue, builtin, names};
use crate::error::{FormcheckError, Result};

pub use templates::{ERROR_KIND, SUMMARY_CONTAINER, TemplateFn};

/// The registry tables, used in error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryKind {
    Check,
    FieldType,
    Message,
    MessageTemplate,
    ContainerTemplate,
    Defaults,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Check => "check",
            Self::FieldType => "field type",
            Self::Message => "message",
            Self::MessageTemplate => "message template",
            Self::ContainerTemplate => "container template",
            Self::Defaults => "defaults",
        };
        write!(f, "{}", name)
    }
}

/// Fallback keys for unresolvable messages and message templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryDefaults {
    /// Message key used when a check has no message of its own
    pub error_type: String,
    /// Message template kind used when a kind is not registered
    pub message_type: String,
}

impl Default for RegistryDefaults {
    fn default() -> Self {
        Self {
            error_type: "generic".to_string(),
            message_type: "note".to_string(),
        }
    }
}

/// Registry of checks, field types, messages and templates.
pub struct Registry {
    checks: HashMap<String, CheckFn>,
    field_types: HashMap<String, Arc<dyn FieldAdapter>>,
    messages: HashMap<String, String>,
    message_templates: HashMap<String, TemplateFn>,
    container_templates: HashMap<String, TemplateFn>,
    defaults: RegistryDefaults,
    sealed: bool,
}

impl Registry {
    /// Create an empty registry in its bootstrap phase
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
            field_types: HashMap::new(),
            messages: HashMap::new(),
            message_templates: HashMap::new(),
            container_templates: HashMap::new(),
            defaults: RegistryDefaults::default(),
            sealed: false,
        }
    }

    /// Create a bootstrap-phase registry holding every built-in entry
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        let checks: [(&str, CheckFn); 6] = [
            (names::REQUIRED, Arc::new(|v: &FieldValue, _: &FieldMeta| builtin::required(v))),
            (names::LENGTH, Arc::new(builtin::length_within_meta)),
            (names::NUMBER, Arc::new(|v: &FieldValue, _: &FieldMeta| builtin::number(v.as_text()))),
            (names::EMAIL, Arc::new(|v: &FieldValue, _: &FieldMeta| builtin::email(v.as_text()))),
            (names::PHONE_NL, Arc::new(|v: &FieldValue, _: &FieldMeta| builtin::phone_nl(v.as_text()))),
            (
                names::POSTALCODE_NL,
                Arc::new(|v: &FieldValue, _: &FieldMeta| builtin::postalcode_nl(v.as_text())),
            ),
        ];
        for (name, check) in checks {
            registry.checks.insert(name.to_string(), check);
        }

        for (name, adapter) in standard::builtin_adapters() {
            let adapter: Arc<dyn FieldAdapter> = Arc::new(adapter);
            registry.field_types.insert(name.to_string(), adapter);
        }
        for (key, text) in templates::BUILTIN_MESSAGES {
            registry.messages.insert(key.to_string(), text.to_string());
        }
        for (kind, template) in templates::builtin_message_templates() {
            registry.message_templates.insert(kind.to_string(), template);
        }
        for (kind, template) in templates::builtin_container_templates() {
            registry.container_templates.insert(kind.to_string(), template);
        }

        registry
    }

    /// Register a named check predicate
    pub fn register_check<F>(&mut self, name: impl Into<String>, check: F) -> Result<()>
    where
        F: Fn(&FieldValue, &FieldMeta) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.ensure_open(RegistryKind::Check, &name)?;
        let check: CheckFn = Arc::new(check);
        insert_new(&mut self.checks, RegistryKind::Check, name, check)
    }

    /// Register an adapter for a field type
    pub fn register_field_type(&mut self, name: impl Into<String>, adapter: impl FieldAdapter + 'static) -> Result<()> {
        let name = name.into();
        self.ensure_open(RegistryKind::FieldType, &name)?;
        let adapter: Arc<dyn FieldAdapter> = Arc::new(adapter);
        insert_new(&mut self.field_types, RegistryKind::FieldType, name, adapter)
    }

    /// Register message text under a key
    pub fn register_message(&mut self, key: impl Into<String>, text: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.ensure_open(RegistryKind::Message, &key)?;
        insert_new(&mut self.messages, RegistryKind::Message, key, text.into())
    }

    /// Register a message template for a message kind
    pub fn register_message_template<F>(&mut self, kind: impl Into<String>, template: F) -> Result<()>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let kind = kind.into();
        self.ensure_open(RegistryKind::MessageTemplate, &kind)?;
        let template: TemplateFn = Arc::new(template);
        insert_new(&mut self.message_templates, RegistryKind::MessageTemplate, kind, template)
    }

    /// Register a container template for a container kind
    pub fn register_container_template<F>(&mut self, kind: impl Into<String>, template: F) -> Result<()>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let kind = kind.into();
        self.ensure_open(RegistryKind::ContainerTemplate, &kind)?;
        let template: TemplateFn = Arc::new(template);
        insert_new(&mut self.container_templates, RegistryKind::ContainerTemplate, kind, template)
    }

    /// Replace the fallback keys (bootstrap phase only)
    pub fn set_defaults(&mut self, defaults: RegistryDefaults) -> Result<()> {
        if self.sealed {
            return Err(FormcheckError::RegistrySealed {
                kind: RegistryKind::Defaults,
                key: format!("{}/{}", defaults.error_type, defaults.message_type),
            });
        }
        self.defaults = defaults;
        Ok(())
    }

    /// End the bootstrap phase.
    ///
    /// Fails if a fallback key has no entry, since resolution must always
    /// succeed once forms exist. Sealing twice is a no-op.
    pub fn seal(&mut self) -> Result<()> {
        if self.sealed {
            return Ok(());
        }
        if !self.messages.contains_key(&self.defaults.error_type) {
            return Err(FormcheckError::MissingDefault {
                kind: RegistryKind::Message,
                key: self.defaults.error_type.clone(),
            });
        }
        if !self.message_templates.contains_key(&self.defaults.message_type) {
            return Err(FormcheckError::MissingDefault {
                kind: RegistryKind::MessageTemplate,
                key: self.defaults.message_type.clone(),
            });
        }
        self.sealed = true;
        log::debug!(
            "Registry sealed: {} checks, {} field types, {} messages",
            self.checks.len(),
            self.field_types.len(),
            self.messages.len()
        );
        Ok(())
    }

    /// Whether the bootstrap phase is over
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Get the fallback keys
    pub fn defaults(&self) -> &RegistryDefaults {
        &self.defaults
    }

    /// Get a check by name
    pub fn check(&self, name: &str) -> Option<&CheckFn> {
        self.checks.get(name)
    }

    /// Evaluate a named check
    pub fn run_check(&self, name: &str, value: &FieldValue, meta: &FieldMeta) -> Result<bool> {
        let check = self
            .checks
            .get(name)
            .ok_or_else(|| FormcheckError::UnknownCheck(name.to_string()))?;
        Ok(check(value, meta))
    }

    /// Get the adapter for a field type
    pub fn field_type(&self, name: &str) -> Option<Arc<dyn FieldAdapter>> {
        self.field_types.get(name).cloned()
    }

    /// Resolve a message, falling back to the default error key
    pub fn resolve_message(&self, key: &str) -> &str {
        self.resolve_message_or(key, &self.defaults.error_type)
    }

    /// Resolve a message, falling back to `fallback_key`, then the default error key
    pub fn resolve_message_or<'a>(&'a self, key: &str, fallback_key: &str) -> &'a str {
        self.messages
            .get(key)
            .or_else(|| self.messages.get(fallback_key))
            .or_else(|| self.messages.get(&self.defaults.error_type))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Resolve a message template, falling back to the default message kind
    pub fn resolve_message_template(&self, kind: &str) -> TemplateFn {
        self.resolve_message_template_or(kind, &self.defaults.message_type)
    }

    /// Resolve a message template, falling back to `fallback_kind`, then the default kind
    pub fn resolve_message_template_or(&self, kind: &str, fallback_kind: &str) -> TemplateFn {
        self.message_templates
            .get(kind)
            .or_else(|| self.message_templates.get(fallback_kind))
            .or_else(|| self.message_templates.get(&self.defaults.message_type))
            .cloned()
            .unwrap_or_else(templates::plain)
    }

    /// Resolve a container template; unknown kinds render nothing
    pub fn resolve_container_template(&self, kind: &str) -> TemplateFn {
        self.container_templates
            .get(kind)
            .cloned()
            .unwrap_or_else(templates::empty)
    }

    /// Render the message for `error_key` with the template for `message_kind`
    pub fn create_message(&self, error_key: &str, message_kind: &str) -> String {
        let template = self.resolve_message_template(message_kind);
        template(self.resolve_message(error_key))
    }

    /// List check names, sorted
    pub fn check_names(&self) -> Vec<&str> {
        sorted_keys(&self.checks)
    }

    /// List field type names, sorted
    pub fn field_type_names(&self) -> Vec<&str> {
        sorted_keys(&self.field_types)
    }

    /// List message keys, sorted
    pub fn message_keys(&self) -> Vec<&str> {
        sorted_keys(&self.messages)
    }

    /// Check if a check is registered
    pub fn contains_check(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Check if a field type is registered
    pub fn contains_field_type(&self, name: &str) -> bool {
        self.field_types.contains_key(name)
    }

    /// Check if a message key is registered
    pub fn contains_message(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Check if a message template kind is registered
    pub fn contains_message_template(&self, kind: &str) -> bool {
        self.message_templates.contains_key(kind)
    }

    fn ensure_open(&self, kind: RegistryKind, key: &str) -> Result<()> {
        if self.sealed {
            return Err(FormcheckError::RegistrySealed {
                kind,
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("checks", &self.check_names())
            .field("field_types", &self.field_type_names())
            .field("messages", &self.message_keys())
            .field("message_templates", &sorted_keys(&self.message_templates))
            .field("container_templates", &sorted_keys(&self.container_templates))
            .field("defaults", &self.defaults)
            .field("sealed", &self.sealed)
            .finish()
    }
}

fn insert_new<V>(table: &mut HashMap<String, V>, kind: RegistryKind, key: String, value: V) -> Result<()> {
    if table.contains_key(&key) {
        return Err(FormcheckError::DuplicateRegistration { kind, key });
    }
    log::debug!("Registered {} '{}'", kind, key);
    table.insert(key, value);
    Ok(())
}

fn sorted_keys<V>(table: &HashMap<String, V>) -> Vec<&str> {
    let mut keys: Vec<&str> = table.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

/// Seal `registry` and publish it as the process-wide registry.
///
/// Only one registry can ever be installed; a second call, or a call after
/// [`global`] has already installed the built-ins, fails.
pub fn install(mut registry: Registry) -> Result<Arc<Registry>> {
    registry.seal()?;
    let registry = Arc::new(registry);
    GLOBAL
        .set(Arc::clone(&registry))
        .map_err(|_| FormcheckError::AlreadyInstalled)?;
    log::info!("Installed process-wide registry");
    Ok(registry)
}

/// The process-wide registry, installing the sealed built-ins on first use.
pub fn global() -> Arc<Registry> {
    Arc::clone(GLOBAL.get_or_init(|| {
        let mut registry = Registry::with_builtins();
        registry.sealed = true;
        Arc::new(registry)
    }))
}
