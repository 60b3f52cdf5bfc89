//! Named checks and their outcomes.
//!
//! A check is a named boolean predicate over a field's value. Adapters
//! produce an ordered [`CheckList`] per value; order is evaluation
//! priority, and the first failing entry is the one a user gets to see.

pub mod builtin;
pub mod outcome;
pub mod value;

use std::sync::Arc;

pub use outcome::{CheckList, CheckResult};
pub use value::{FieldMeta, FieldValue};

/// A registered check predicate.
pub type CheckFn = Arc<dyn Fn(&FieldValue, &FieldMeta) -> bool + Send + Sync>;

/// Names of the built-in checks.
pub mod names {
    pub const REQUIRED: &str = "required";
    pub const LENGTH: &str = "length";
    pub const NUMBER: &str = "number";
    pub const EMAIL: &str = "email";
    pub const PHONE_NL: &str = "phoneNL";
    pub const POSTALCODE_NL: &str = "postalcodeNL";
}
