//! In-memory forms described in YAML.
//!
//! A fixture lists a form's fields and a script of input events and submits.
//! Replaying it drives a real [`FormValidator`], which makes fixtures useful
//! both for the `simulate` command and for tests.
//!
//! ```yaml
//! form: signup
//! fields:
//!   - { handle: name, type: text, min_length: 2 }
//!   - { handle: email, type: email }
//!   - { handle: terms, type: checkbox }
//! script:
//!   - input: { field: name, value: "J", event: blur }
//!   - submit
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::adapter::InputEvent;
use crate::check::FieldMeta;
use crate::config::FormConfig;
use crate::error::Result;
use crate::field::FieldState;
use crate::form::{FormValidator, SubmitOutcome};
use crate::host::{ElementLocator, FieldElement, FieldHandle, FormHandle, Renderer};
use crate::registry::Registry;

/// A field declared in a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub handle: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: Vec<String>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Simulate a field whose text input has gone missing
    #[serde(default)]
    pub detached: bool,
}

#[derive(Debug, Clone, Default)]
struct Inputs {
    value: Option<String>,
    checked: Vec<String>,
}

/// A field element whose inputs can be changed from the outside
#[derive(Debug)]
pub struct StaticField {
    handle: FieldHandle,
    declared_type: String,
    meta: FieldMeta,
    inputs: Mutex<Inputs>,
}

impl StaticField {
    /// A field with a text input
    pub fn text(handle: &str, declared_type: &str, value: &str) -> Self {
        Self {
            handle: FieldHandle::from(handle),
            declared_type: declared_type.to_string(),
            meta: FieldMeta::default(),
            inputs: Mutex::new(Inputs {
                value: Some(value.to_string()),
                checked: Vec::new(),
            }),
        }
    }

    /// An option group with the given options checked
    pub fn options(handle: &str, declared_type: &str, checked: &[&str]) -> Self {
        Self {
            handle: FieldHandle::from(handle),
            declared_type: declared_type.to_string(),
            meta: FieldMeta::default(),
            inputs: Mutex::new(Inputs {
                value: None,
                checked: checked.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// Build from a fixture declaration
    pub fn from_spec(spec: &FieldSpec) -> Self {
        let field = Self {
            handle: FieldHandle(spec.handle.clone()),
            declared_type: spec.declared_type.clone(),
            meta: FieldMeta::with_length(spec.min_length, spec.max_length),
            inputs: Mutex::new(Inputs {
                value: Some(spec.value.clone()),
                checked: spec.checked.clone(),
            }),
        };
        if spec.detached { field.detached() } else { field }
    }

    /// Set length bounds (builder pattern)
    pub fn with_length(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.meta = FieldMeta::with_length(min_length, max_length);
        self
    }

    /// Remove the text input (builder pattern)
    pub fn detached(self) -> Self {
        self.detach();
        self
    }

    /// Replace the text value
    pub fn set_value(&self, value: &str) {
        self.lock().value = Some(value.to_string());
    }

    /// Replace the checked options
    pub fn set_checked(&self, checked: Vec<String>) {
        self.lock().checked = checked;
    }

    /// Remove the text input
    pub fn detach(&self) {
        self.lock().value = None;
    }

    fn lock(&self) -> MutexGuard<'_, Inputs> {
        self.inputs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FieldElement for StaticField {
    fn handle(&self) -> &FieldHandle {
        &self.handle
    }

    fn declared_type(&self) -> &str {
        &self.declared_type
    }

    fn input_value(&self) -> Option<String> {
        self.lock().value.clone()
    }

    fn checked_values(&self) -> Vec<String> {
        self.lock().checked.clone()
    }

    fn meta(&self) -> FieldMeta {
        self.meta
    }
}

/// Locator over a fixed list of fields
#[derive(Debug, Default)]
pub struct StaticLocator {
    fields: Vec<Arc<StaticField>>,
}

impl StaticLocator {
    /// Create a locator over the given fields, in order
    pub fn new(fields: Vec<StaticField>) -> Self {
        Self {
            fields: fields.into_iter().map(Arc::new).collect(),
        }
    }

    /// Get a field by handle
    pub fn field(&self, handle: &str) -> Option<&Arc<StaticField>> {
        self.fields.iter().find(|f| f.handle.0 == handle)
    }
}

impl ElementLocator for StaticLocator {
    fn find_fields(&self, _form: &FormHandle) -> Vec<Arc<dyn FieldElement>> {
        self.fields
            .iter()
            .map(|f| Arc::clone(f) as Arc<dyn FieldElement>)
            .collect()
    }
}

/// One step of a fixture script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    /// Optionally change a field's inputs, then dispatch an event to it
    Input {
        field: String,
        event: InputEvent,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        checked: Option<Vec<String>>,
    },
    /// Submit the form
    Submit,
}

impl Step {
    /// Human-readable one-liner
    pub fn describe(&self) -> String {
        match self {
            Self::Input {
                field, event, value, ..
            } => match value {
                Some(value) => format!("{:?} on {} with {:?}", event, field, value),
                None => format!("{:?} on {}", event, field),
            },
            Self::Submit => "submit".to_string(),
        }
    }
}

/// A form plus the script to replay against it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFixture {
    pub form: String,
    #[serde(default)]
    pub config: Option<FormConfig>,
    pub fields: Vec<FieldSpec>,
    /// Steps are written as `- submit` or `- input: { ... }`
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub script: Vec<Step>,
}

/// State of one field after a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    pub field: FieldHandle,
    pub state: FieldState,
    /// Check whose error is shown, if any
    pub error: Option<String>,
}

/// What one step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: String,
    /// Set on submit steps
    pub outcome: Option<SubmitOutcome>,
    pub fields: Vec<FieldReport>,
}

impl FormFixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a fixture file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Build a locator over fresh fields
    pub fn locator(&self) -> StaticLocator {
        StaticLocator::new(self.fields.iter().map(StaticField::from_spec).collect())
    }

    /// Replay the script against a new form validator.
    ///
    /// The fixture's own config wins over `default_config`.
    pub fn run(
        &self,
        registry: Arc<Registry>,
        renderer: Arc<dyn Renderer>,
        default_config: &FormConfig,
    ) -> Result<Vec<StepReport>> {
        let locator = self.locator();
        let config = self.config.clone().unwrap_or_else(|| default_config.clone());
        let mut form = FormValidator::new(FormHandle(self.form.clone()), &locator, renderer, registry, config)?;

        let mut reports = Vec::with_capacity(self.script.len());
        for step in &self.script {
            let outcome = match step {
                Step::Input {
                    field,
                    event,
                    value,
                    checked,
                } => {
                    if let Some(element) = locator.field(field) {
                        if let Some(value) = value {
                            element.set_value(value);
                        }
                        if let Some(checked) = checked {
                            element.set_checked(checked.clone());
                        }
                    }
                    form.handle_event(&FieldHandle(field.clone()), *event)?;
                    None
                }
                Step::Submit => Some(form.on_submit()?),
            };

            reports.push(StepReport {
                step: step.describe(),
                outcome,
                fields: snapshot(&form),
            });
        }

        Ok(reports)
    }
}

fn snapshot(form: &FormValidator) -> Vec<FieldReport> {
    form.fields()
        .iter()
        .map(|f| FieldReport {
            field: f.handle().clone(),
            state: f.state(),
            error: f.error().map(|e| e.check.clone()),
        })
        .collect()
}
