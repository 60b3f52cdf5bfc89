//! Form validation integration tests
//!
//! Drives whole forms through the public API with in-memory fields and a
//! recording renderer.

use std::sync::Arc;

use formcheck::adapter::standard::{StandardAdapter, ValueReader};
use formcheck::adapter::InputEvent;
use formcheck::config::{Config, FormConfig};
use formcheck::error::{FormcheckError, Result};
use formcheck::fixture::{FormFixture, StaticField, StaticLocator};
use formcheck::host::{FieldHandle, FormHandle, RecordingRenderer, RenderCall};
use formcheck::{FieldState, FormValidator, Registry, SubmitOutcome};
use tempfile::TempDir;

fn sealed(registry: Registry) -> Arc<Registry> {
    let mut registry = registry;
    registry.seal().unwrap();
    Arc::new(registry)
}

fn signup_locator() -> StaticLocator {
    StaticLocator::new(vec![
        StaticField::text("name", "text", "").with_length(Some(2), None),
        StaticField::text("email", "email", "not-an-email"),
        StaticField::options("terms", "checkbox", &[]),
    ])
}

fn signup_form(renderer: Arc<RecordingRenderer>) -> Result<FormValidator> {
    FormValidator::new(
        FormHandle::from("signup"),
        &signup_locator(),
        renderer,
        sealed(Registry::with_builtins()),
        FormConfig::default(),
    )
}

/// Integration test: a submit with three broken fields rejects with one error each
#[test]
fn test_submit_reports_first_failure_per_field() -> Result<()> {
    let renderer = Arc::new(RecordingRenderer::new());
    let mut form = signup_form(Arc::clone(&renderer))?;

    let outcome = form.on_submit()?;
    assert!(!outcome.is_accepted());
    assert!(form.is_processed());

    let checks: Vec<(String, String)> = outcome
        .errors()
        .iter()
        .map(|e| (e.field.to_string(), e.check.clone()))
        .collect();
    assert_eq!(
        checks,
        vec![
            ("name".to_string(), "required".to_string()),
            ("email".to_string(), "email".to_string()),
            ("terms".to_string(), "required".to_string()),
        ]
    );

    // One error per field, shown in discovery order
    let shown: Vec<String> = renderer.shown_errors().into_iter().map(|(_, check)| check).collect();
    assert_eq!(shown, vec!["required", "email", "required"]);

    let summaries = renderer
        .calls()
        .into_iter()
        .filter(|c| matches!(c, RenderCall::ShowSummary { errors: 3, .. }))
        .count();
    assert_eq!(summaries, 1);
    Ok(())
}

/// Integration test: messages carry the registered text inside the error template
#[test]
fn test_error_messages_use_registered_text() -> Result<()> {
    let renderer = Arc::new(RecordingRenderer::new());
    let mut form = signup_form(renderer)?;

    let outcome = form.on_submit()?;
    let error = &outcome.errors()[0];
    assert_eq!(error.message, "This field is required");
    assert!(error.markup.contains("This field is required"));
    assert!(error.markup.contains("flt-form__message-error"));
    Ok(())
}

/// Integration test: required is held back before the first submit, then surfaces
#[test]
fn test_surfacing_before_and_after_submit() -> Result<()> {
    let renderer = Arc::new(RecordingRenderer::new());
    let mut form = signup_form(Arc::clone(&renderer))?;
    let name = FieldHandle::from("name");

    assert_eq!(form.handle_event(&name, InputEvent::Change)?, Some(FieldState::Neutral));
    assert!(renderer.calls_for(&name).iter().all(|c| !matches!(c, RenderCall::ShowError { .. })));

    form.on_submit()?;
    renderer.clear();

    assert_eq!(form.handle_event(&name, InputEvent::Change)?, Some(FieldState::Invalid));
    assert_eq!(renderer.shown_errors(), vec![(name.clone(), "required".to_string())]);
    Ok(())
}

/// Integration test: a surfacing check shows on change without a submit
#[test]
fn test_surfacing_check_shows_immediately() -> Result<()> {
    let renderer = Arc::new(RecordingRenderer::new());
    let mut form = signup_form(Arc::clone(&renderer))?;
    let email = FieldHandle::from("email");

    assert_eq!(form.handle_event(&email, InputEvent::Change)?, Some(FieldState::Invalid));
    assert_eq!(form.state_of(&email), Some(FieldState::Invalid));
    assert!(!form.is_processed());

    // Typing drops the field back to neutral and clears its message
    assert_eq!(form.handle_event(&email, InputEvent::KeyDown)?, Some(FieldState::Neutral));
    let calls = renderer.calls_for(&email);
    assert!(calls.ends_with(&[RenderCall::MarkNeutral(email.clone()), RenderCall::ClearMessages(email.clone())]));
    Ok(())
}

/// Integration test: a fixed form is accepted
#[test]
fn test_submit_accepted_after_fixes() -> Result<()> {
    let renderer = Arc::new(RecordingRenderer::new());
    let locator = signup_locator();
    let mut form = FormValidator::new(
        FormHandle::from("signup"),
        &locator,
        renderer.clone(),
        sealed(Registry::with_builtins()),
        FormConfig::default(),
    )?;

    assert!(!form.on_submit()?.is_accepted());

    locator.field("name").unwrap().set_value("Jan");
    locator.field("email").unwrap().set_value("jan@example.nl");
    locator.field("terms").unwrap().set_checked(vec!["yes".to_string()]);

    assert_eq!(form.on_submit()?, SubmitOutcome::Accepted);
    assert!(form.is_valid());
    assert!(form.errors().is_empty());
    Ok(())
}

/// Integration test: host-registered checks, field types and messages work end to end
#[test]
fn test_custom_field_type() -> Result<()> {
    let mut registry = Registry::with_builtins();
    registry.register_check("even", |value, _meta| {
        value.as_text().parse::<u64>().map(|n| n % 2 == 0).unwrap_or(false)
    })?;
    registry.register_message("even", "Enter an even number")?;
    registry.register_field_type(
        "even",
        StandardAdapter::new("even number", ValueReader::Text)
            .with_check("required")
            .with_check("even")
            .typed_input(["even"]),
    )?;
    let registry = sealed(registry);

    let locator = StaticLocator::new(vec![StaticField::text("count", "even", "3")]);
    let renderer = Arc::new(RecordingRenderer::new());
    let mut form = FormValidator::new(
        FormHandle::from("order"),
        &locator,
        renderer.clone(),
        registry,
        FormConfig::default(),
    )?;

    let count = FieldHandle::from("count");
    assert_eq!(form.handle_event(&count, InputEvent::Blur)?, Some(FieldState::Invalid));
    assert_eq!(form.field(&count).unwrap().error().unwrap().message, "Enter an even number");

    locator.field("count").unwrap().set_value("4");
    assert_eq!(form.handle_event(&count, InputEvent::Blur)?, Some(FieldState::Valid));
    Ok(())
}

/// Integration test: unknown field types are rejected when the form is bound
#[test]
fn test_unsupported_field_type() {
    let locator = StaticLocator::new(vec![StaticField::text("when", "date", "")]);
    let err = FormValidator::new(
        FormHandle::from("booking"),
        &locator,
        Arc::new(RecordingRenderer::new()),
        sealed(Registry::with_builtins()),
        FormConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FormcheckError::UnsupportedFieldType(t) if t == "date"));
}

/// Integration test: an adapter failure leaves the field as it was
#[test]
fn test_adapter_failure_rolls_back() -> Result<()> {
    let locator = StaticLocator::new(vec![StaticField::text("name", "text", "Jan")]);
    let renderer = Arc::new(RecordingRenderer::new());
    let mut form = FormValidator::new(
        FormHandle::from("profile"),
        &locator,
        renderer.clone(),
        sealed(Registry::with_builtins()),
        FormConfig::default(),
    )?;
    let name = FieldHandle::from("name");

    assert_eq!(form.handle_event(&name, InputEvent::Blur)?, Some(FieldState::Valid));
    let calls_before = renderer.calls().len();

    locator.field("name").unwrap().detach();
    let err = form.handle_event(&name, InputEvent::Blur).unwrap_err();
    assert!(matches!(err, FormcheckError::AdapterFailure { .. }));
    assert_eq!(form.state_of(&name), Some(FieldState::Valid));
    assert_eq!(renderer.calls().len(), calls_before);
    Ok(())
}

/// Integration test: config file messages reach the rendered errors
#[test]
fn test_config_file_messages() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("formcheck.yml");
    std::fs::write(
        &path,
        "form:\n  error_type: fallback\nmessages:\n  fallback: Something is off\n",
    )?;

    let config = Config::load(Some(&path)).unwrap();
    let mut registry = Registry::with_builtins();
    config.apply(&mut registry).unwrap();
    registry.register_check("never", |_value, _meta| false)?;
    registry.register_field_type(
        "strict",
        StandardAdapter::new("strict", ValueReader::Text).with_check("never"),
    )?;
    let registry = sealed(registry);

    let locator = StaticLocator::new(vec![StaticField::text("code", "strict", "x")]);
    let mut form = FormValidator::new(
        FormHandle::from("f"),
        &locator,
        Arc::new(RecordingRenderer::new()),
        registry,
        config.form.clone(),
    )?;

    // "never" has no message of its own
    let outcome = form.on_submit()?;
    assert_eq!(outcome.errors()[0].check, "never");
    assert_eq!(outcome.errors()[0].message, "Something is off");
    Ok(())
}

/// Integration test: a fixture file replays through the public API
#[test]
fn test_fixture_file_replay() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("contact.yml");
    std::fs::write(
        &path,
        r#"
form: contact
fields:
  - { handle: phone, type: phoneNL }
  - { handle: zip, type: postalcodeNL, value: "1234 AB" }
  - { handle: choice, type: radio }
script:
  - input: { field: phone, value: "12", event: blur }
  - input: { field: phone, value: "0612345678", event: change }
  - submit
"#,
    )?;

    let fixture = FormFixture::from_file(&path)?;
    let reports = fixture.run(
        sealed(Registry::with_builtins()),
        Arc::new(RecordingRenderer::new()),
        &FormConfig::default(),
    )?;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].fields[0].state, FieldState::Invalid);
    assert_eq!(reports[0].fields[0].error.as_deref(), Some("phoneNL"));
    assert_eq!(reports[1].fields[0].state, FieldState::Valid);

    let outcome = reports[2].outcome.as_ref().unwrap();
    assert_eq!(outcome.invalid_fields(), vec![&FieldHandle::from("choice")]);
    assert_eq!(reports[2].fields[1].state, FieldState::Valid);
    Ok(())
}
