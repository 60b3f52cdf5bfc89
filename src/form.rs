//! Whole-form orchestration.
//!
//! A [`FormValidator`] discovers its fields once, binds each to the adapter
//! of its declared type and owns the submit-attempted flag. Once a submit
//! has been attempted the flag never resets, and every later failure on any
//! trigger surfaces immediately.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::InputEvent;
use crate::config::FormConfig;
use crate::error::{FormcheckError, Result};
use crate::field::{FieldSettings, FieldState, FieldValidator};
use crate::host::{ElementLocator, FieldError, FieldHandle, FormHandle, Renderer};
use crate::registry::{self, Registry, SUMMARY_CONTAINER};
use crate::trigger::TriggerEvent;

/// The outcome of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "outcome", content = "errors")]
pub enum SubmitOutcome {
    /// Every field is valid; the default submit action may proceed.
    Accepted,
    /// At least one field is invalid; the default submit action must be cancelled.
    Rejected(Vec<FieldError>),
}

impl SubmitOutcome {
    /// Check if the submit may proceed
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Get the errors of a rejected submit
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Accepted => &[],
            Self::Rejected(errors) => errors,
        }
    }

    /// Get the handles of the invalid fields
    pub fn invalid_fields(&self) -> Vec<&FieldHandle> {
        self.errors().iter().map(|e| &e.field).collect()
    }
}

/// Validator for one form instance
pub struct FormValidator {
    form: FormHandle,
    fields: Vec<FieldValidator>,
    registry: Arc<Registry>,
    renderer: Arc<dyn Renderer>,
    config: FormConfig,
    processed: bool,
}

impl FormValidator {
    /// Discover the form's fields and bind each to its field type.
    ///
    /// Fails if the registry is still in its bootstrap phase, if the form's
    /// configured fallback keys are not registered, or if any field declares
    /// a type with no adapter.
    pub fn new(
        form: FormHandle,
        locator: &dyn ElementLocator,
        renderer: Arc<dyn Renderer>,
        registry: Arc<Registry>,
        config: FormConfig,
    ) -> Result<Self> {
        if !registry.is_sealed() {
            return Err(FormcheckError::RegistryNotSealed);
        }
        let settings: FieldSettings = config.resolve(&registry)?;

        let mut fields = Vec::new();
        for element in locator.find_fields(&form) {
            let declared_type = element.declared_type().to_string();
            let adapter = registry
                .field_type(&declared_type)
                .ok_or_else(|| FormcheckError::UnsupportedFieldType(declared_type.clone()))?;

            if settings.debug {
                log::debug!("Binding field {} as {}", element.handle(), declared_type);
            }
            fields.push(FieldValidator::new(
                element,
                adapter,
                Arc::clone(&registry),
                Arc::clone(&renderer),
                settings.clone(),
            ));
        }

        log::info!("Form {} bound {} fields", form, fields.len());

        Ok(Self {
            form,
            fields,
            registry,
            renderer,
            config,
            processed: false,
        })
    }

    /// Same as [`FormValidator::new`], on the process-wide registry
    pub fn with_global_registry(
        form: FormHandle,
        locator: &dyn ElementLocator,
        renderer: Arc<dyn Renderer>,
        config: FormConfig,
    ) -> Result<Self> {
        Self::new(form, locator, renderer, registry::global(), config)
    }

    /// Handle a submit attempt.
    ///
    /// The processed flag is latched before any field runs, so this very
    /// pass already treats the form as submitted. Fields are validated in
    /// discovery order; an adapter failure aborts the pass and propagates.
    pub fn on_submit(&mut self) -> Result<SubmitOutcome> {
        self.processed = true;

        if self.config.debug {
            log::debug!("Validating form {}", self.form);
        }

        let trigger = TriggerEvent::submitted();
        let mut errors = Vec::new();
        for field in &mut self.fields {
            if field.validate(&trigger, self.processed)? == FieldState::Invalid {
                if let Some(error) = field.error() {
                    errors.push(error.clone());
                }
            }
        }

        if errors.is_empty() {
            log::info!("Form {} accepted", self.form);
            return Ok(SubmitOutcome::Accepted);
        }

        log::info!("Form {} rejected: {} invalid fields", self.form, errors.len());
        self.renderer.show_summary(&self.form, &errors);
        Ok(SubmitOutcome::Rejected(errors))
    }

    /// Dispatch a host input event to one field.
    ///
    /// Returns `None` if the field's type does not bind the event.
    pub fn handle_event(&mut self, field: &FieldHandle, event: InputEvent) -> Result<Option<FieldState>> {
        let processed = self.processed;
        self.field_mut(field)?.handle_event(event, processed)
    }

    /// Run one validation pass on one field with an explicit trigger
    pub fn validate_field(&mut self, field: &FieldHandle, trigger: &TriggerEvent) -> Result<FieldState> {
        let processed = self.processed;
        self.field_mut(field)?.validate(trigger, processed)
    }

    /// Whether a submit has been attempted
    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Whether every field's last pass was valid
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.state().is_valid())
    }

    /// Get the form handle
    pub fn handle(&self) -> &FormHandle {
        &self.form
    }

    /// Get the field validators, in discovery order
    pub fn fields(&self) -> &[FieldValidator] {
        &self.fields
    }

    /// Get a field validator by handle
    pub fn field(&self, field: &FieldHandle) -> Option<&FieldValidator> {
        self.fields.iter().find(|f| f.handle() == field)
    }

    /// Get a field's state
    pub fn state_of(&self, field: &FieldHandle) -> Option<FieldState> {
        self.field(field).map(FieldValidator::state)
    }

    /// Errors currently shown, in discovery order
    pub fn errors(&self) -> Vec<&FieldError> {
        self.fields.iter().filter_map(FieldValidator::error).collect()
    }

    /// Markup of the shown errors wrapped in the summary container
    pub fn summary_markup(&self) -> String {
        let inner: String = self.errors().iter().map(|e| e.markup.as_str()).collect();
        if inner.is_empty() {
            return String::new();
        }
        let container = self.registry.resolve_container_template(SUMMARY_CONTAINER);
        container(&inner)
    }

    /// Render a message with this form's fallback keys.
    ///
    /// Like [`Registry::create_message`], but an unknown key or kind falls
    /// back to the form's configured `error_type` or `message_type` first.
    pub fn create_message(&self, error_key: &str, message_kind: &str) -> String {
        let defaults = self.registry.defaults();
        let error_type = self.config.error_type.as_deref().unwrap_or(&defaults.error_type);
        let message_type = self.config.message_type.as_deref().unwrap_or(&defaults.message_type);
        let template = self.registry.resolve_message_template_or(message_kind, message_type);
        template(self.registry.resolve_message_or(error_key, error_type))
    }

    /// Get the number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the form has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field_mut(&mut self, field: &FieldHandle) -> Result<&mut FieldValidator> {
        self.fields
            .iter_mut()
            .find(|f| f.handle() == field)
            .ok_or_else(|| FormcheckError::UnknownField(field.to_string()))
    }
}

impl fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValidator")
            .field("form", &self.form)
            .field("fields", &self.fields)
            .field("processed", &self.processed)
            .finish()
    }
}
