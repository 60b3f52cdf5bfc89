//! Validation triggers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What caused a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    /// The field's value changed
    InputChanged,
    /// The field lost focus
    InputBlurred,
    /// The whole form was submitted
    FormSubmitted,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputChanged => "input-changed",
            Self::InputBlurred => "input-blurred",
            Self::FormSubmitted => "form-submitted",
        };
        write!(f, "{}", name)
    }
}

/// A trigger plus the checks allowed to surface an error before the first submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub kind: TriggerKind,
    /// Check names whose failure may be shown on a non-submit trigger
    #[serde(default)]
    pub surfacing: Vec<String>,
}

impl TriggerEvent {
    /// Create a trigger
    pub fn new<I, S>(kind: TriggerKind, surfacing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            surfacing: surfacing.into_iter().map(Into::into).collect(),
        }
    }

    /// A value-changed trigger
    pub fn changed<I, S>(surfacing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(TriggerKind::InputChanged, surfacing)
    }

    /// A blur trigger
    pub fn blurred<I, S>(surfacing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(TriggerKind::InputBlurred, surfacing)
    }

    /// A submit trigger; it surfaces every failure, so it carries no list
    pub fn submitted() -> Self {
        Self {
            kind: TriggerKind::FormSubmitted,
            surfacing: Vec::new(),
        }
    }

    /// Whether this is a submit trigger
    pub fn is_submit(&self) -> bool {
        self.kind == TriggerKind::FormSubmitted
    }

    /// Whether `check` is in the surfacing list
    pub fn allows(&self, check: &str) -> bool {
        self.surfacing.iter().any(|name| name == check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_trigger() {
        let trigger = TriggerEvent::changed(["length"]);
        assert_eq!(trigger.kind, TriggerKind::InputChanged);
        assert!(trigger.allows("length"));
        assert!(!trigger.allows("required"));
        assert!(!trigger.is_submit());
    }

    #[test]
    fn test_empty_surfacing_allows_nothing() {
        let trigger = TriggerEvent::blurred(Vec::<String>::new());
        assert!(!trigger.allows("length"));
    }

    #[test]
    fn test_submitted_trigger() {
        let trigger = TriggerEvent::submitted();
        assert!(trigger.is_submit());
        assert!(trigger.surfacing.is_empty());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TriggerKind::FormSubmitted.to_string(), "form-submitted");
        assert_eq!(TriggerKind::InputBlurred.to_string(), "input-blurred");
    }

    #[test]
    fn test_trigger_yaml() {
        let trigger: TriggerEvent = serde_yaml::from_str("kind: input-changed\nsurfacing: [email]").unwrap();
        assert_eq!(trigger, TriggerEvent::changed(["email"]));
    }
}
