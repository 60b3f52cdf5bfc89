//! Built-in check predicates.
//!
//! Each predicate is pure and synchronous. The registry wraps them as
//! [`CheckFn`](super::CheckFn)s under the names in [`super::names`].

use std::sync::LazyLock;

use regex::Regex;

use super::value::{FieldMeta, FieldValue};

// Local part, then dot-separated host labels of 1-63 alphanumeric/hyphen chars
// without a leading or trailing hyphen. At least one dot is required.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:(?:[0-9]+|[0-9]{1,3}(?:,[0-9]{3})+)(?:\.[0-9]+)?|\.[0-9]+)$").expect("number pattern is valid")
});

// +31 / 0031 / 0 prefix, optional (0), then nine digits with optional separators.
static PHONE_NL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\+|00(?:\s|\s?-\s?)?)31(?:\s|\s?-\s?)?(?:\(0\)[-\s]?)?|0)[1-9](?:(?:\s|\s?-\s?)?[0-9]){8}$")
        .expect("phone pattern is valid")
});

static POSTALCODE_NL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{3}\s?[a-zA-Z]{2}$").expect("postal code pattern is valid"));

/// Passes iff the value is filled in.
pub fn required(value: &FieldValue) -> bool {
    value.is_present()
}

/// Passes iff the character count is within the bounds that are set.
pub fn length(value: &str, min: Option<usize>, max: Option<usize>) -> bool {
    let len = value.chars().count();
    if min.is_some_and(|min| len < min) {
        return false;
    }
    if max.is_some_and(|max| len > max) {
        return false;
    }
    true
}

/// Passes iff the value is a single-line email address.
pub fn email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Passes iff the value is a decimal number, optionally thousands-separated.
pub fn number(value: &str) -> bool {
    NUMBER.is_match(value)
}

/// Passes iff the value is a Dutch phone number.
pub fn phone_nl(value: &str) -> bool {
    PHONE_NL.is_match(value)
}

/// Passes iff the value is a Dutch postal code (e.g. "1234 AB").
pub fn postalcode_nl(value: &str) -> bool {
    POSTALCODE_NL.is_match(value)
}

/// `length` against the bounds declared on the field.
pub fn length_within_meta(value: &FieldValue, meta: &FieldMeta) -> bool {
    length(value.as_text(), meta.min_length, meta.max_length)
}
