//! Host collaborators.
//!
//! The engine never touches a visual tree. Hosts hand it field elements
//! through an [`ElementLocator`] and receive display instructions through a
//! [`Renderer`].

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::check::FieldMeta;

/// Stable identifier of a form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormHandle(pub String);

/// Stable identifier of a field within a form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldHandle(pub String);

impl fmt::Display for FormHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FormHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for FieldHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A field as exposed by the host
pub trait FieldElement: Send + Sync {
    /// Stable handle of this field
    fn handle(&self) -> &FieldHandle;

    /// Declared field type (e.g., "text", "email")
    fn declared_type(&self) -> &str;

    /// Text of the field's input, or `None` if it has no text input
    fn input_value(&self) -> Option<String>;

    /// Values of the checked options, in document order
    fn checked_values(&self) -> Vec<String>;

    /// Constraints declared on the element
    fn meta(&self) -> FieldMeta;
}

/// Discovers the fields of a form.
///
/// Must return the same handle for the same physical field on every call.
pub trait ElementLocator {
    /// The form's fields, in discovery order
    fn find_fields(&self, form: &FormHandle) -> Vec<Arc<dyn FieldElement>>;
}

/// A surfaced error for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field the error belongs to
    pub field: FieldHandle,
    /// Name of the failing check
    pub check: String,
    /// Resolved message text
    pub message: String,
    /// Message text rendered through the message template
    pub markup: String,
}

/// Receives display instructions. All calls are fire-and-forget.
pub trait Renderer: Send + Sync {
    /// Show an error for a field
    fn show_error(&self, field: &FieldHandle, error: &FieldError);

    /// Remove any message shown for a field
    fn clear_messages(&self, field: &FieldHandle);

    /// Mark a field as valid
    fn mark_valid(&self, field: &FieldHandle);

    /// Mark a field as invalid
    fn mark_invalid(&self, field: &FieldHandle);

    /// Remove valid/invalid marking from a field
    fn mark_neutral(&self, field: &FieldHandle);

    /// Present the errors of a rejected submit
    fn show_summary(&self, _form: &FormHandle, _errors: &[FieldError]) {}
}

/// A renderer call, as captured by [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    ShowError { field: FieldHandle, check: String },
    ClearMessages(FieldHandle),
    MarkValid(FieldHandle),
    MarkInvalid(FieldHandle),
    MarkNeutral(FieldHandle),
    ShowSummary { form: FormHandle, errors: usize },
}

/// Renderer that records every call, for tests and dry runs
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<RenderCall> {
        self.lock().clone()
    }

    /// `(field, check)` of every `show_error` call, in order
    pub fn shown_errors(&self) -> Vec<(FieldHandle, String)> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::ShowError { field, check } => Some((field.clone(), check.clone())),
                _ => None,
            })
            .collect()
    }

    /// Recorded calls for one field
    pub fn calls_for(&self, field: &FieldHandle) -> Vec<RenderCall> {
        self.lock()
            .iter()
            .filter(|call| match call {
                RenderCall::ShowError { field: f, .. }
                | RenderCall::ClearMessages(f)
                | RenderCall::MarkValid(f)
                | RenderCall::MarkInvalid(f)
                | RenderCall::MarkNeutral(f) => f == field,
                RenderCall::ShowSummary { .. } => false,
            })
            .cloned()
            .collect()
    }

    /// Forget every recorded call
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, call: RenderCall) {
        self.lock().push(call);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RenderCall>> {
        // A poisoned recorder only means a test already panicked mid-record
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Renderer for RecordingRenderer {
    fn show_error(&self, field: &FieldHandle, error: &FieldError) {
        self.record(RenderCall::ShowError {
            field: field.clone(),
            check: error.check.clone(),
        });
    }

    fn clear_messages(&self, field: &FieldHandle) {
        self.record(RenderCall::ClearMessages(field.clone()));
    }

    fn mark_valid(&self, field: &FieldHandle) {
        self.record(RenderCall::MarkValid(field.clone()));
    }

    fn mark_invalid(&self, field: &FieldHandle) {
        self.record(RenderCall::MarkInvalid(field.clone()));
    }

    fn mark_neutral(&self, field: &FieldHandle) {
        self.record(RenderCall::MarkNeutral(field.clone()));
    }

    fn show_summary(&self, form: &FormHandle, errors: &[FieldError]) {
        self.record(RenderCall::ShowSummary {
            form: form.clone(),
            errors: errors.len(),
        });
    }
}
