//! Error types for formcheck
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::registry::RegistryKind;

/// All error types that can occur in formcheck
#[derive(Debug, Error)]
pub enum FormcheckError {
    /// A registry key was registered twice
    #[error("Duplicate registration: {kind} '{key}' is already registered")]
    DuplicateRegistration { kind: RegistryKind, key: String },

    /// A registration was attempted after the registry was sealed
    #[error("Registry is sealed: cannot register {kind} '{key}'")]
    RegistrySealed { kind: RegistryKind, key: String },

    /// A process-wide registry was installed twice
    #[error("A process-wide registry is already installed")]
    AlreadyInstalled,

    /// A form was built on a registry still in its bootstrap phase
    #[error("Registry is not sealed: seal it before constructing forms")]
    RegistryNotSealed,

    /// A configured default key has no registered entry
    #[error("Missing default: {kind} '{key}' is not registered")]
    MissingDefault { kind: RegistryKind, key: String },

    /// A field declared a type with no registered adapter
    #[error("Unsupported field type: {0}")]
    UnsupportedFieldType(String),

    /// An adapter referenced a check that is not registered
    #[error("Unknown check: {0}")]
    UnknownCheck(String),

    /// A field handle that the form does not own
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// An adapter could not read a value or produce its checks
    #[error("Adapter failure on field {field}: {reason}")]
    AdapterFailure { field: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormcheckError {
    /// Whether this error signals a host-application setup bug rather than a
    /// failure of a single validation pass.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRegistration { .. }
                | Self::RegistrySealed { .. }
                | Self::AlreadyInstalled
                | Self::RegistryNotSealed
                | Self::MissingDefault { .. }
                | Self::UnsupportedFieldType(_)
        )
    }
}

/// Result type alias for formcheck operations
pub type Result<T> = std::result::Result<T, FormcheckError>;
