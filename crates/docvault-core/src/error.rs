//! Error taxonomy: field failures, configuration mistakes, registry
//! misuse and errors raised by rule functions.

use crate::{context::Cancelled, reflect::Kind, value::Value};
use std::fmt;
use thiserror::Error as ThisError;

/// Error type returned by rule functions.
pub type RuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

///
/// Error
///
/// Exactly one of these comes back from a failed validation call; no
/// partial document is ever returned alongside it.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("data must be a struct record, found {type_name} ({kind})")]
    Shape { type_name: &'static str, kind: Kind },

    #[error(transparent)]
    Field(Box<FieldError>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("rule '{rule}' failed for '{path}': {source}")]
    Rule {
        rule: String,
        path: String,
        #[source]
        source: RuleError,
    },

    #[error("store error: {0}")]
    Store(#[source] RuleError),
}

impl Error {
    /// Sort a rule function's error into the taxonomy: configuration
    /// mistakes and cancellation keep their own variants.
    pub(crate) fn from_rule(rule: &str, path: &str, source: RuleError) -> Self {
        let source = match source.downcast::<ConfigError>() {
            Ok(config) => return Self::Config(*config),
            Err(other) => other,
        };
        let source = match source.downcast::<Cancelled>() {
            Ok(_) => return Self::Cancelled(Cancelled),
            Err(other) => other,
        };

        Self::Rule {
            rule: rule.to_string(),
            path: path.to_string(),
            source,
        }
    }

    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }

    #[must_use]
    pub fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            Self::Field(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        self.as_field_error().map(FieldError::code)
    }
}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        Self::Field(Box::new(err))
    }
}

///
/// ErrorCode
/// Reason attached to a [`FieldError`].
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCode {
    UnknownValidation,
    UnknownTransformation,
    FailedValidation,
    FailedTransformation,
    UnsupportedFieldType,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownValidation => "unknown-validation",
            Self::UnknownTransformation => "unknown-transformation",
            Self::FailedValidation => "failed-validation",
            Self::FailedTransformation => "failed-transformation",
            Self::UnsupportedFieldType => "unsupported-field-type",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// FieldSite
///
/// Where a field failure happened and what the field held at the time.
/// Shared by every error raised for the same field.
///

#[derive(Clone, Debug)]
pub(crate) struct FieldSite {
    pub field: String,
    pub struct_field: &'static str,
    pub path: String,
    pub value: Value,
    pub kind: Kind,
    pub type_name: &'static str,
}

///
/// FieldError
///
/// Structured, data-driven failure for a single field.
///

#[derive(Debug, ThisError)]
#[error("field validation for '{field}' failed on the '{tag}' tag")]
pub struct FieldError {
    code: ErrorCode,
    tag: String,
    field: String,
    struct_field: &'static str,
    path: String,
    value: Value,
    param: String,
    kind: Kind,
    type_name: &'static str,
    #[source]
    source: Option<RuleError>,
}

impl FieldError {
    pub(crate) fn new(code: ErrorCode, site: &FieldSite, tag: &str, param: &str) -> Self {
        Self {
            code,
            tag: tag.to_string(),
            field: site.field.clone(),
            struct_field: site.struct_field,
            path: site.path.clone(),
            value: site.value.clone(),
            param: param.to_string(),
            kind: site.kind,
            type_name: site.type_name,
            source: None,
        }
    }

    #[must_use]
    pub(crate) fn with_source(mut self, source: RuleError) -> Self {
        self.source = Some(source);
        self
    }

    /// Reason for the error, e.g. `failed-validation`.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// The rule token that failed, as written in the tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Output field name; the tag name takes precedence over the native
    /// identifier.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Native field identifier.
    #[must_use]
    pub const fn struct_field(&self) -> &'static str {
        self.struct_field
    }

    /// Full field path from the record root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Rule parameter, empty when the rule took none.
    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

///
/// ConfigError
///
/// A rule was used in a way the schema author got wrong; distinct from
/// the data failing a rule.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("provide a {rule} param - {path}")]
    MissingParam { rule: &'static str, path: String },

    #[error("invalid {rule} param '{param}' - {path}: {reason}")]
    InvalidParam {
        rule: &'static str,
        path: String,
        param: String,
        reason: String,
    },

    #[error("{rule} does not support {found} values - {path}")]
    UnsupportedValue {
        rule: &'static str,
        path: String,
        found: &'static str,
    },

    #[error("invalid built-in pattern for {rule}")]
    InvalidPattern { rule: &'static str },
}

///
/// RuleKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleKind {
    Validation,
    Transformation,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::Transformation => "transformation",
        };
        write!(f, "{label}")
    }
}

///
/// RegistrationError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistrationError {
    #[error("{kind} function name cannot be empty")]
    EmptyName { kind: RuleKind },

    #[error("{kind} function name '{name}' cannot be written in a tag")]
    InvalidName { kind: RuleKind, name: String },
}
