//! formcheck - A declarative field-validation engine for interactive forms
//!
//! Forms are made of typed fields. Each field type has an adapter that turns
//! the field's value into an ordered list of named checks; the first failing
//! check is the one error a user sees, and when they see it depends on the
//! trigger and on whether the form has been submitted before. Hosts extend the
//! engine through a process-wide, append-only registry of checks, field types,
//! messages and templates.

pub mod adapter;
pub mod check;
pub mod config;
pub mod error;
pub mod field;
pub mod fixture;
pub mod form;
pub mod host;
pub mod registry;
pub mod trigger;

pub use error::{FormcheckError, Result};
pub use field::{FieldState, FieldValidator};
pub use form::{FormValidator, SubmitOutcome};
pub use registry::Registry;
