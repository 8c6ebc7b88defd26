//! Per-call options and the settings they resolve to for one walk.

use crate::{config::Config, rule::REQUIRED, tag::Omission};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

// ============================================================================
// Method
// ============================================================================

///
/// Method
/// The operation a validation call is performed for.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Create,
    Update,
    Validate,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Validate => "validate",
        }
    }

    // Omission directives this method honors.
    const fn honors(self, omission: Omission) -> bool {
        match omission {
            Omission::Always => true,
            Omission::Create => matches!(self, Self::Create),
            Omission::Update => matches!(self, Self::Update | Self::Validate),
            Omission::Validate => matches!(self, Self::Validate),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FieldPath
// ============================================================================

///
/// FieldPath
///
/// Non-empty sequence of field names locating a value, e.g. `["a", "b"]`
/// for the dotted form `a.b`.
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Split a dotted path into segments.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.'))
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<Vec<String>> for FieldPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

// ============================================================================
// Options
// ============================================================================

///
/// Options
///
/// Per-call switches. Every builder method consumes and returns the
/// options, so a value is never changed behind a caller's back.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Options {
    skip_validation: bool,
    skip_required: bool,
    unskip_required: bool,
    allow_empty_fields: Vec<FieldPath>,
    merge_fields: Vec<FieldPath>,
    id: Option<String>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run no rules. Names, omission directives and the ignore marker
    /// still apply.
    #[must_use]
    pub const fn skip_validation(mut self) -> Self {
        self.skip_validation = true;
        self
    }

    /// Ignore `required` while creating.
    #[must_use]
    pub const fn skip_required(mut self) -> Self {
        self.skip_required = true;
        self
    }

    /// Honor `required` while updating or validating.
    #[must_use]
    pub const fn unskip_required(mut self) -> Self {
        self.unskip_required = true;
        self
    }

    /// Paths whose omission directives are ignored for this call.
    #[must_use]
    pub fn allow_empty_fields<I, P>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPath>,
    {
        self.allow_empty_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Paths to overwrite on update; everything else on the stored
    /// document is left alone.
    #[must_use]
    pub fn merge_fields<I, P>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPath>,
    {
        self.merge_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Document id to create under instead of a generated one.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn custom_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn merge_targets(&self) -> &[FieldPath] {
        &self.merge_fields
    }

    #[must_use]
    pub fn allowed_empty(&self) -> &[FieldPath] {
        &self.allow_empty_fields
    }

    /// Combine these options with the configured defaults for `method`.
    #[must_use]
    pub fn resolve(&self, method: Method, config: &Config) -> ValidationOpts {
        let defaults = config.method(method);

        let skip_required = if self.unskip_required {
            false
        } else if self.skip_required {
            true
        } else {
            defaults
                .skip_required
                .unwrap_or(!matches!(method, Method::Create))
        };

        let allow_empty_fields = defaults
            .allow_empty_fields
            .iter()
            .map(|path| FieldPath::parse(path).to_string())
            .chain(self.allow_empty_fields.iter().map(ToString::to_string))
            .collect();

        ValidationOpts {
            method,
            skip_validation: self.skip_validation || defaults.skip_validation,
            skip_required,
            allow_empty_fields,
        }
    }
}

// ============================================================================
// ValidationOpts
// ============================================================================

///
/// ValidationOpts
/// Resolved settings for a single walk.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationOpts {
    method: Method,
    skip_validation: bool,
    skip_required: bool,
    allow_empty_fields: HashSet<String>,
}

impl ValidationOpts {
    /// Defaults for `method` with no per-call options and no config.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Options::new().resolve(method, &Config::default())
    }

    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub const fn skip_validation(&self) -> bool {
        self.skip_validation
    }

    #[must_use]
    pub const fn skip_required(&self) -> bool {
        self.skip_required
    }

    #[must_use]
    pub const fn honors(&self, omission: Omission) -> bool {
        self.method.honors(omission)
    }

    #[must_use]
    pub fn is_empty_allowed(&self, path: &str) -> bool {
        self.allow_empty_fields.contains(path)
    }

    /// How a rule name relates to the required family for this walk.
    #[must_use]
    pub fn required_status(&self, rule: &str) -> RequiredStatus {
        if rule == REQUIRED {
            return if self.skip_required {
                RequiredStatus::Skipped
            } else {
                RequiredStatus::Active
            };
        }

        let scoped = rule
            .strip_prefix(REQUIRED)
            .and_then(|rest| rest.strip_prefix('_'));
        match scoped {
            Some(method) if method == self.method.as_str() => RequiredStatus::Active,
            Some("create" | "update" | "validate") => RequiredStatus::Skipped,
            _ => RequiredStatus::NotRequired,
        }
    }
}

///
/// RequiredStatus
///
/// Active      → runs even when the value is empty.
/// Skipped     → never runs during this walk.
/// NotRequired → an ordinary rule; skipped only for empty values.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequiredStatus {
    Active,
    Skipped,
    NotRequired,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MethodConfig;

    #[test]
    fn required_defaults_per_method() {
        assert!(!ValidationOpts::new(Method::Create).skip_required());
        assert!(ValidationOpts::new(Method::Update).skip_required());
        assert!(ValidationOpts::new(Method::Validate).skip_required());
    }

    #[test]
    fn per_call_switches_override_defaults() {
        let config = Config::default();

        let create = Options::new().skip_required().resolve(Method::Create, &config);
        assert!(create.skip_required());

        let update = Options::new()
            .unskip_required()
            .resolve(Method::Update, &config);
        assert!(!update.skip_required());

        let both = Options::new()
            .skip_required()
            .unskip_required()
            .resolve(Method::Create, &config);
        assert!(!both.skip_required());
    }

    #[test]
    fn config_defaults_apply_when_options_are_silent() {
        let config = Config {
            update: MethodConfig {
                skip_validation: true,
                skip_required: Some(false),
                allow_empty_fields: vec!["profile.bio".to_string()],
            },
            ..Config::default()
        };

        let opts = Options::new()
            .allow_empty_fields(["tags"])
            .resolve(Method::Update, &config);

        assert!(opts.skip_validation());
        assert!(!opts.skip_required());
        assert!(opts.is_empty_allowed("profile.bio"));
        assert!(opts.is_empty_allowed("tags"));
        assert!(!opts.is_empty_allowed("profile"));
    }

    #[test]
    fn omission_policy_per_method() {
        let create = ValidationOpts::new(Method::Create);
        assert!(create.honors(Omission::Always));
        assert!(create.honors(Omission::Create));
        assert!(!create.honors(Omission::Update));

        let update = ValidationOpts::new(Method::Update);
        assert!(update.honors(Omission::Update));
        assert!(!update.honors(Omission::Validate));

        let validate = ValidationOpts::new(Method::Validate);
        assert!(validate.honors(Omission::Update));
        assert!(validate.honors(Omission::Validate));
        assert!(!validate.honors(Omission::Create));
    }

    #[test]
    fn required_rules_are_scoped_to_the_method() {
        let create = ValidationOpts::new(Method::Create);
        assert_eq!(create.required_status("required"), RequiredStatus::Active);
        assert_eq!(
            create.required_status("required_create"),
            RequiredStatus::Active
        );
        assert_eq!(
            create.required_status("required_update"),
            RequiredStatus::Skipped
        );
        assert_eq!(create.required_status("min"), RequiredStatus::NotRequired);
        assert_eq!(
            create.required_status("required_soon"),
            RequiredStatus::NotRequired
        );

        // skip_required leaves the scoped forms alone
        let update = ValidationOpts::new(Method::Update);
        assert_eq!(update.required_status("required"), RequiredStatus::Skipped);
        assert_eq!(
            update.required_status("required_update"),
            RequiredStatus::Active
        );
    }

    #[test]
    fn builder_accumulates_paths_and_id() {
        let options = Options::new()
            .merge_fields(["name"])
            .merge_fields([FieldPath::new(["address", "city"])])
            .id("user-1");

        assert_eq!(options.custom_id(), Some("user-1"));
        let rendered: Vec<_> = options
            .merge_targets()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, ["name", "address.city"]);
    }
}
