//! Data-driven adapter used by every built-in field type.
//!
//! A [`StandardAdapter`] is a value reader, an ordered list of registered
//! check names and a table of event bindings. Hosts can build their own
//! field types the same way instead of implementing [`FieldAdapter`].

use crate::check::{CheckList, CheckResult, FieldMeta, FieldValue, names};
use crate::error::{FormcheckError, Result};
use crate::host::FieldElement;
use crate::registry::Registry;
use crate::trigger::TriggerEvent;

use super::{FieldAdapter, InputEvent, TriggerAction, TriggerBindings};

/// How a field's value is read from its element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReader {
    /// The text of the field's single input
    Text,
    /// The value of the first checked option
    CheckedOption,
    /// The number of checked options
    CheckedCount,
}

impl ValueReader {
    /// Read a value from an element
    pub fn read(&self, element: &dyn FieldElement) -> Result<FieldValue> {
        match self {
            Self::Text => element
                .input_value()
                .map(FieldValue::Text)
                .ok_or_else(|| FormcheckError::AdapterFailure {
                    field: element.handle().to_string(),
                    reason: "field has no text input".to_string(),
                }),
            Self::CheckedOption => Ok(FieldValue::Choice(element.checked_values().into_iter().next())),
            Self::CheckedCount => Ok(FieldValue::Checked(element.checked_values().len())),
        }
    }
}

/// Adapter assembled from a reader, named checks and event bindings
#[derive(Debug, Clone)]
pub struct StandardAdapter {
    description: String,
    reader: ValueReader,
    checks: Vec<String>,
    bindings: Vec<(InputEvent, TriggerAction)>,
}

impl StandardAdapter {
    /// Create an adapter with no checks and no bindings
    pub fn new(description: impl Into<String>, reader: ValueReader) -> Self {
        Self {
            description: description.into(),
            reader,
            checks: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Append a named check (builder pattern); order is priority
    pub fn with_check(mut self, name: impl Into<String>) -> Self {
        self.checks.push(name.into());
        self
    }

    /// Bind an input event to an action (builder pattern)
    pub fn on(mut self, event: InputEvent, action: TriggerAction) -> Self {
        self.bindings.push((event, action));
        self
    }

    /// Typed-input behaviour: keydown neutralizes, change and blur validate
    /// and surface the given checks.
    pub fn typed_input<I, S>(self, surfacing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let surfacing: Vec<String> = surfacing.into_iter().map(Into::into).collect();
        self.on(InputEvent::KeyDown, TriggerAction::Neutralize)
            .on(
                InputEvent::Change,
                TriggerAction::Validate(TriggerEvent::changed(surfacing.clone())),
            )
            .on(InputEvent::Blur, TriggerAction::Validate(TriggerEvent::blurred(surfacing)))
    }

    /// Option-group behaviour: change validates and surfaces the given checks
    pub fn option_group<I, S>(self, surfacing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.on(
            InputEvent::Change,
            TriggerAction::Validate(TriggerEvent::changed(surfacing)),
        )
    }

    /// Names of the checks, in order
    pub fn check_names(&self) -> &[String] {
        &self.checks
    }

    /// Get the value reader
    pub fn reader(&self) -> ValueReader {
        self.reader
    }

    /// Single-line text: required, then length
    pub fn text() -> Self {
        Self::new("text", ValueReader::Text)
            .with_check(names::REQUIRED)
            .with_check(names::LENGTH)
            .typed_input([names::LENGTH])
    }

    /// Numeric text: required, number format, then length
    pub fn number() -> Self {
        Self::new("number", ValueReader::Text)
            .with_check(names::REQUIRED)
            .with_check(names::NUMBER)
            .with_check(names::LENGTH)
            .typed_input([names::NUMBER, names::LENGTH])
    }

    /// Email address: required, then email format
    pub fn email() -> Self {
        Self::new("email", ValueReader::Text)
            .with_check(names::REQUIRED)
            .with_check(names::EMAIL)
            .typed_input([names::EMAIL])
    }

    /// Dutch phone number: required, then phone format
    pub fn phone_nl() -> Self {
        Self::new("phoneNL", ValueReader::Text)
            .with_check(names::REQUIRED)
            .with_check(names::PHONE_NL)
            .typed_input([names::PHONE_NL])
    }

    /// Dutch postal code: required, then postal code format
    pub fn postalcode_nl() -> Self {
        Self::new("postalcodeNL", ValueReader::Text)
            .with_check(names::REQUIRED)
            .with_check(names::POSTALCODE_NL)
            .typed_input([names::POSTALCODE_NL])
    }

    /// Radio group: an option must be selected
    pub fn radio() -> Self {
        Self::new("radio", ValueReader::CheckedOption)
            .with_check(names::REQUIRED)
            .option_group([names::REQUIRED])
    }

    /// Checkbox group: at least one box must be checked
    pub fn checkbox() -> Self {
        Self::new("checkbox", ValueReader::CheckedCount)
            .with_check(names::REQUIRED)
            .option_group([names::REQUIRED])
    }
}

impl FieldAdapter for StandardAdapter {
    fn read_value(&self, element: &dyn FieldElement) -> Result<FieldValue> {
        self.reader.read(element)
    }

    fn produce_checks(&self, value: &FieldValue, meta: &FieldMeta, registry: &Registry) -> Result<CheckList> {
        self.checks
            .iter()
            .map(|name| Ok(CheckResult::new(name.as_str(), registry.run_check(name, value, meta)?)))
            .collect()
    }

    fn bind_triggers(&self, bindings: &mut TriggerBindings) {
        for (event, action) in &self.bindings {
            bindings.bind(*event, action.clone());
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Built-in field types, keyed by their declared type name
pub(crate) fn builtin_adapters() -> Vec<(&'static str, StandardAdapter)> {
    vec![
        ("text", StandardAdapter::text()),
        ("number", StandardAdapter::number()),
        ("email", StandardAdapter::email()),
        ("phoneNL", StandardAdapter::phone_nl()),
        ("postalcodeNL", StandardAdapter::postalcode_nl()),
        ("radio", StandardAdapter::radio()),
        ("checkbox", StandardAdapter::checkbox()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::StaticField;
    use crate::trigger::TriggerKind;

    fn registry() -> Registry {
        Registry::with_builtins()
    }

    fn checks_for(adapter: &StandardAdapter, element: &StaticField) -> CheckList {
        let value = adapter.read_value(element).unwrap();
        adapter.produce_checks(&value, &element.meta(), &registry()).unwrap()
    }

    #[test]
    fn test_every_builtin_starts_with_required() {
        let registry = registry();
        for (name, adapter) in builtin_adapters() {
            let list = adapter
                .produce_checks(&FieldValue::default(), &FieldMeta::default(), &registry)
                .unwrap();
            assert!(!list.is_empty(), "{} produced no checks", name);
            assert_eq!(list.results()[0].name, "required", "{} does not check required first", name);
        }
    }

    #[test]
    fn test_text_checks_in_order() {
        let field = StaticField::text("name", "text", "ab").with_length(Some(3), None);
        let list = checks_for(&StandardAdapter::text(), &field);
        assert_eq!(
            list.results(),
            &[CheckResult::pass("required"), CheckResult::fail("length")]
        );
    }

    #[test]
    fn test_number_reports_format_before_length() {
        let field = StaticField::text("age", "number", "abc").with_length(None, Some(2));
        let list = checks_for(&StandardAdapter::number(), &field);
        assert_eq!(list.first_failure(), Some("number"));
        assert_eq!(list.failures(), vec!["number", "length"]);
    }

    #[test]
    fn test_email_empty_fails_required_first() {
        let field = StaticField::text("mail", "email", "");
        let list = checks_for(&StandardAdapter::email(), &field);
        assert_eq!(list.first_failure(), Some("required"));
    }

    #[test]
    fn test_phone_nl() {
        let field = StaticField::text("phone", "phoneNL", "020-1234567");
        assert!(checks_for(&StandardAdapter::phone_nl(), &field).all_passed());

        let field = StaticField::text("phone", "phoneNL", "12345");
        assert_eq!(
            checks_for(&StandardAdapter::phone_nl(), &field).first_failure(),
            Some("phoneNL")
        );
    }

    #[test]
    fn test_radio_reads_checked_option() {
        let field = StaticField::options("size", "radio", &["m"]);
        let adapter = StandardAdapter::radio();
        assert_eq!(
            adapter.read_value(&field).unwrap(),
            FieldValue::Choice(Some("m".to_string()))
        );
        assert!(checks_for(&adapter, &field).all_passed());

        let field = StaticField::options("size", "radio", &[]);
        assert_eq!(checks_for(&adapter, &field).first_failure(), Some("required"));
    }

    #[test]
    fn test_checkbox_counts_checked() {
        let adapter = StandardAdapter::checkbox();
        let field = StaticField::options("terms", "checkbox", &["a", "b"]);
        assert_eq!(adapter.read_value(&field).unwrap(), FieldValue::Checked(2));

        let field = StaticField::options("terms", "checkbox", &[]);
        assert_eq!(checks_for(&adapter, &field).first_failure(), Some("required"));
    }

    #[test]
    fn test_text_reader_without_input_fails() {
        let field = StaticField::text("gone", "text", "").detached();
        let err = StandardAdapter::text().read_value(&field).unwrap_err();
        assert!(matches!(err, FormcheckError::AdapterFailure { .. }));
    }

    #[test]
    fn test_unknown_check_propagates() {
        let adapter = StandardAdapter::new("custom", ValueReader::Text).with_check("missing");
        let err = adapter
            .produce_checks(&FieldValue::from("x"), &FieldMeta::default(), &registry())
            .unwrap_err();
        assert!(matches!(err, FormcheckError::UnknownCheck(name) if name == "missing"));
    }

    #[test]
    fn test_typed_input_bindings() {
        let mut bindings = TriggerBindings::new();
        StandardAdapter::email().bind_triggers(&mut bindings);

        assert_eq!(bindings.action_for(InputEvent::KeyDown), Some(&TriggerAction::Neutralize));
        assert!(!bindings.is_bound(InputEvent::KeyUp));
        match bindings.action_for(InputEvent::Blur) {
            Some(TriggerAction::Validate(trigger)) => {
                assert_eq!(trigger.kind, TriggerKind::InputBlurred);
                assert_eq!(trigger.surfacing, vec!["email".to_string()]);
            }
            other => panic!("unexpected binding: {:?}", other),
        }
    }

    #[test]
    fn test_option_group_bindings() {
        let mut bindings = TriggerBindings::new();
        StandardAdapter::checkbox().bind_triggers(&mut bindings);

        assert_eq!(bindings.len(), 1);
        assert!(matches!(
            bindings.action_for(InputEvent::Change),
            Some(TriggerAction::Validate(t)) if t.allows("required")
        ));
    }

    #[test]
    fn test_custom_standard_adapter() {
        let adapter = StandardAdapter::new("zip", ValueReader::Text)
            .with_check(names::REQUIRED)
            .with_check(names::POSTALCODE_NL)
            .typed_input([names::POSTALCODE_NL]);

        assert_eq!(adapter.description(), "zip");
        assert_eq!(adapter.check_names(), &["required".to_string(), "postalcodeNL".to_string()]);
        assert_eq!(adapter.reader(), ValueReader::Text);
    }
}
