//! Per-field validation state machine.
//!
//! A [`FieldValidator`] starts `Unvalidated`. Every pass reads the value,
//! collects the adapter's ordered checks and reduces them to the first
//! failure. A clean pass ends `Valid`. A failing pass first drops to
//! `Neutral`, clearing whatever was displayed, and only then decides whether
//! the failure may surface:
//!
//! - always on a submit trigger,
//! - always once the form has been submitted,
//! - otherwise only if the failing check is in the trigger's surfacing list.
//!
//! A surfaced failure ends `Invalid` with exactly one error shown. A hidden
//! one stays `Neutral`. Only the first failing check is ever shown.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::{FieldAdapter, InputEvent, TriggerAction, TriggerBindings};
use crate::check::CheckList;
use crate::error::{FormcheckError, Result};
use crate::host::{FieldElement, FieldError, FieldHandle, Renderer};
use crate::registry::{ERROR_KIND, Registry};
use crate::trigger::TriggerEvent;

/// Validity state of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldState {
    /// Never validated
    #[default]
    Unvalidated,
    /// No error shown; the field is either being edited or invalid but not yet surfaced
    Neutral,
    /// Every check passed
    Valid,
    /// A failure is being shown
    Invalid,
}

impl FieldState {
    /// Check if the state is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unvalidated => "unvalidated",
            Self::Neutral => "neutral",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        };
        write!(f, "{}", name)
    }
}

/// Message keys and diagnostics resolved for the fields of one form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSettings {
    /// Message key used when a failing check has no message
    pub error_type: String,
    /// Message template kind used when the error kind has no template
    pub message_type: String,
    /// Log every validation pass
    pub debug: bool,
}

/// Validation state machine for one field
pub struct FieldValidator {
    element: Arc<dyn FieldElement>,
    adapter: Arc<dyn FieldAdapter>,
    bindings: TriggerBindings,
    registry: Arc<Registry>,
    renderer: Arc<dyn Renderer>,
    settings: FieldSettings,
    state: FieldState,
    failure: Option<String>,
    error: Option<FieldError>,
    last_checks: Option<CheckList>,
}

impl FieldValidator {
    /// Bind a field element to its adapter.
    ///
    /// The adapter is resolved once, here, and its trigger bindings cached.
    pub fn new(
        element: Arc<dyn FieldElement>,
        adapter: Arc<dyn FieldAdapter>,
        registry: Arc<Registry>,
        renderer: Arc<dyn Renderer>,
        settings: FieldSettings,
    ) -> Self {
        let mut bindings = TriggerBindings::new();
        adapter.bind_triggers(&mut bindings);

        Self {
            element,
            adapter,
            bindings,
            registry,
            renderer,
            settings,
            state: FieldState::Unvalidated,
            failure: None,
            error: None,
            last_checks: None,
        }
    }

    /// Run one validation pass.
    ///
    /// `processed` is the owning form's submit-attempted flag. On an adapter
    /// failure nothing has changed yet: state, display and last checks are
    /// those of the previous pass.
    pub fn validate(&mut self, trigger: &TriggerEvent, processed: bool) -> Result<FieldState> {
        let checks = self.collect_checks()?;
        let failure = checks.first_failure().map(str::to_string);

        if self.settings.debug {
            log::debug!(
                "Validating {} on {}: checks={:?} first_failure={:?} processed={}",
                self.handle(),
                trigger.kind,
                checks.results(),
                failure,
                processed
            );
        }

        match &failure {
            None => self.set_valid(),
            Some(check) => {
                self.set_neutral();
                let surface = trigger.is_submit() || processed || trigger.allows(check);
                if surface {
                    self.set_invalid(check);
                } else if self.settings.debug {
                    log::debug!("Holding back '{}' on {}", check, self.handle());
                }
            }
        }

        self.failure = failure;
        self.last_checks = Some(checks);
        Ok(self.state)
    }

    /// Dispatch a host input event through the adapter's bindings.
    ///
    /// Returns `None` if the event is not bound for this field type.
    pub fn handle_event(&mut self, event: InputEvent, processed: bool) -> Result<Option<FieldState>> {
        let Some(action) = self.bindings.action_for(event).cloned() else {
            return Ok(None);
        };

        match action {
            TriggerAction::Validate(trigger) => self.validate(&trigger, processed).map(Some),
            TriggerAction::Neutralize => {
                self.set_neutral();
                Ok(Some(self.state))
            }
        }
    }

    /// Drop to `Neutral`, clearing any displayed error and marking
    pub fn neutralize(&mut self) {
        self.set_neutral();
    }

    /// Get the current state
    pub fn state(&self) -> FieldState {
        self.state
    }

    /// Get the field handle
    pub fn handle(&self) -> &FieldHandle {
        self.element.handle()
    }

    /// Get the declared field type
    pub fn declared_type(&self) -> &str {
        self.element.declared_type()
    }

    /// Get the adapter's description
    pub fn description(&self) -> &str {
        self.adapter.description()
    }

    /// The error currently shown, if any
    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    /// First failing check of the last completed pass, shown or not
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Check results of the last completed pass
    pub fn last_checks(&self) -> Option<&CheckList> {
        self.last_checks.as_ref()
    }

    /// Get the cached trigger bindings
    pub fn bindings(&self) -> &TriggerBindings {
        &self.bindings
    }

    fn collect_checks(&self) -> Result<CheckList> {
        let value = self
            .adapter
            .read_value(self.element.as_ref())
            .map_err(|e| self.adapter_failure(e))?;
        let meta = self.element.meta();
        self.adapter
            .produce_checks(&value, &meta, &self.registry)
            .map_err(|e| self.adapter_failure(e))
    }

    fn adapter_failure(&self, error: FormcheckError) -> FormcheckError {
        let error = match error {
            FormcheckError::AdapterFailure { .. } => error,
            other => FormcheckError::AdapterFailure {
                field: self.handle().to_string(),
                reason: other.to_string(),
            },
        };
        log::warn!("{}", error);
        error
    }

    fn set_valid(&mut self) {
        self.state = FieldState::Valid;
        self.error = None;
        self.renderer.clear_messages(self.element.handle());
        self.renderer.mark_valid(self.element.handle());
    }

    fn set_neutral(&mut self) {
        self.state = FieldState::Neutral;
        self.error = None;
        self.renderer.mark_neutral(self.element.handle());
        self.renderer.clear_messages(self.element.handle());
    }

    fn set_invalid(&mut self, check: &str) {
        let message = self
            .registry
            .resolve_message_or(check, &self.settings.error_type)
            .to_string();
        let template = self
            .registry
            .resolve_message_template_or(ERROR_KIND, &self.settings.message_type);
        let error = FieldError {
            field: self.handle().clone(),
            check: check.to_string(),
            markup: template(&message),
            message,
        };

        if self.settings.debug {
            log::debug!("Placing error on {}: {}", self.handle(), error.markup);
        }

        self.state = FieldState::Invalid;
        self.renderer.mark_invalid(self.element.handle());
        self.renderer.show_error(self.element.handle(), &error);
        self.error = Some(error);
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("handle", self.handle())
            .field("declared_type", &self.declared_type())
            .field("state", &self.state)
            .field("failure", &self.failure)
            .finish()
    }
}
