//! Process-wide registry integration tests
//!
//! The global registry can only be installed once per process, so these
//! tests live in their own binary and run as one sequence.

use std::sync::Arc;

use formcheck::config::FormConfig;
use formcheck::error::FormcheckError;
use formcheck::fixture::{StaticField, StaticLocator};
use formcheck::host::{FieldHandle, FormHandle, RecordingRenderer};
use formcheck::registry::{self, Registry};
use formcheck::{FieldState, FormValidator};

#[test]
fn test_install_then_use_global_registry() {
    let mut registry = Registry::with_builtins();
    registry.register_message("nickname", "Pick a nickname").unwrap();
    let installed = registry::install(registry).unwrap();
    assert!(installed.is_sealed());

    // Same registry, sealed
    let global = registry::global();
    assert!(Arc::ptr_eq(&installed, &global));
    assert_eq!(global.resolve_message("nickname"), "Pick a nickname");

    // A second install is refused
    let err = registry::install(Registry::with_builtins()).unwrap_err();
    assert!(matches!(err, FormcheckError::AlreadyInstalled));

    let locator = StaticLocator::new(vec![StaticField::text("zip", "postalcodeNL", "0123 AB")]);
    let mut form = FormValidator::with_global_registry(
        FormHandle::from("address"),
        &locator,
        Arc::new(RecordingRenderer::new()),
        FormConfig::default(),
    )
    .unwrap();

    let zip = FieldHandle::from("zip");
    assert_eq!(
        form.handle_event(&zip, formcheck::adapter::InputEvent::Blur).unwrap(),
        Some(FieldState::Invalid)
    );
    assert_eq!(form.field(&zip).unwrap().failure(), Some("postalcodeNL"));
}
