//! Values read from fields and the metadata checks may consult.

use serde::{Deserialize, Serialize};

/// The current value of a field, as read by its adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum FieldValue {
    /// Free text from a single input
    Text(String),
    /// The value of the selected option of a group, if any
    Choice(Option<String>),
    /// How many options of a group are checked
    Checked(usize),
}

impl FieldValue {
    /// Textual view of the value; empty when nothing is selected.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Choice(Some(s)) => s,
            Self::Choice(None) | Self::Checked(_) => "",
        }
    }

    /// Whether the value counts as filled in.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => !s.trim().is_empty(),
            Self::Choice(choice) => choice.as_deref().is_some_and(|s| !s.trim().is_empty()),
            Self::Checked(count) => *count != 0,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Constraints declared on the field element itself (HTML5-style attributes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMeta {
    /// Minimum length in characters
    pub min_length: Option<usize>,
    /// Maximum length in characters
    pub max_length: Option<usize>,
}

impl FieldMeta {
    /// Metadata with both length bounds set
    pub fn with_length(min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Self { min_length, max_length }
    }
}
