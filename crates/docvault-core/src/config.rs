//! Per-method defaults, loadable from TOML.

use crate::options::Method;
use serde::{Deserialize, Serialize};

///
/// Config
///
/// Per-method defaults, usually loaded once from TOML:
///
/// ```toml
/// [update]
/// skip_required = false
/// allow_empty_fields = ["profile.bio"]
/// ```
///
/// Per-call [`Options`](crate::options::Options) take precedence.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub create: MethodConfig,
    pub update: MethodConfig,
    pub validate: MethodConfig,
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    #[must_use]
    pub const fn method(&self, method: Method) -> &MethodConfig {
        match method {
            Method::Create => &self.create,
            Method::Update => &self.update,
            Method::Validate => &self.validate,
        }
    }
}

///
/// MethodConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MethodConfig {
    pub skip_validation: bool,

    /// Unset keeps the built-in default: required on create only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_required: Option<bool>,

    /// Dotted paths whose omission directives are ignored.
    pub allow_empty_fields: Vec<String>,
}

///
/// TESTS
///
