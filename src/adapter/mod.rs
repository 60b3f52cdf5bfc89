//! Field-type adapters.
//!
//! An adapter knows, for one field type, how to read the field's value, which
//! ordered checks that value must pass, and which host input events should
//! trigger validation. Field validators hold an adapter by composition; the
//! value-reading default is shared through [`ValueReader`].

pub mod standard;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::check::{CheckList, FieldMeta, FieldValue};
use crate::error::Result;
use crate::host::FieldElement;
use crate::registry::Registry;
use crate::trigger::TriggerEvent;

pub use standard::{StandardAdapter, ValueReader};

/// Raw input events a host dispatches to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputEvent {
    KeyDown,
    KeyUp,
    Change,
    Blur,
}

/// What a bound input event does to its field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    /// Run a validation pass with this trigger
    Validate(TriggerEvent),
    /// Drop to the neutral state while the user is still editing
    Neutralize,
}

/// Mapping from host input events to trigger actions for one field
#[derive(Debug, Clone, Default)]
pub struct TriggerBindings {
    actions: HashMap<InputEvent, TriggerAction>,
}

impl TriggerBindings {
    /// Create an empty set of bindings
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Bind an input event; a later binding for the same event replaces the earlier one
    pub fn bind(&mut self, event: InputEvent, action: TriggerAction) {
        self.actions.insert(event, action);
    }

    /// Get the action bound to an event
    pub fn action_for(&self, event: InputEvent) -> Option<&TriggerAction> {
        self.actions.get(&event)
    }

    /// Check if an event is bound
    pub fn is_bound(&self, event: InputEvent) -> bool {
        self.actions.contains_key(&event)
    }

    /// Get the number of bound events
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Strategy for one field type
pub trait FieldAdapter: Send + Sync {
    /// Read the field's current value
    fn read_value(&self, element: &dyn FieldElement) -> Result<FieldValue> {
        ValueReader::Text.read(element)
    }

    /// Produce the ordered check results for a value
    fn produce_checks(&self, value: &FieldValue, meta: &FieldMeta, registry: &Registry) -> Result<CheckList>;

    /// Declare which input events trigger what
    fn bind_triggers(&self, bindings: &mut TriggerBindings);

    /// Get a description of this field type
    fn description(&self) -> &str {
        "field adapter"
    }
}
