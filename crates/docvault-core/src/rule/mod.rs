//! Built-in validation rules.
//!
//! Every built-in is a pure function of the value and parameter it is
//! given, so one registry can serve any number of concurrent calls.

mod bound;
mod email;


use crate::{context::Context, error::RuleError, registry::ValidationFn, value::Value};
use std::sync::Arc;

pub use bound::{validate_max, validate_min};
pub use email::validate_email;

/// Name of the general `required` rule.
pub const REQUIRED: &str = "required";

const BUILTIN_NAMES: [&str; 7] = [
    REQUIRED,
    "required_create",
    "required_update",
    "required_validate",
    "email",
    "max",
    "min",
];

/// Every built-in validation, keyed by its tag name.
#[must_use]
pub fn builtins() -> Vec<(&'static str, ValidationFn)> {
    let required: ValidationFn = Arc::new(validate_required);

    vec![
        (REQUIRED, Arc::clone(&required)),
        ("required_create", Arc::clone(&required)),
        ("required_update", Arc::clone(&required)),
        ("required_validate", required),
        ("email", Arc::new(validate_email) as ValidationFn),
        ("max", Arc::new(validate_max) as ValidationFn),
        ("min", Arc::new(validate_min) as ValidationFn),
    ]
}

#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Passes when the value is not its kind's zero-equivalent.
pub fn validate_required(
    _: &Context,
    _: &str,
    value: &Value,
    _: &str,
) -> Result<bool, RuleError> {
    Ok(value.has_value())
}
