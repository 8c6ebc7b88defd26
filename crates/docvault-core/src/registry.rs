//! Named validation and transformation functions.

use crate::{
    context::Context,
    error::{RegistrationError, RuleError, RuleKind},
    rule,
    value::Value,
};
use std::{collections::HashMap, fmt, sync::Arc};

/// Validation rule: `(ctx, path, value, param) -> passed?`.
pub type ValidationFn =
    Arc<dyn Fn(&Context, &str, &Value, &str) -> Result<bool, RuleError> + Send + Sync>;

/// Transformation rule: `(ctx, path, value) -> replacement`.
/// `Ok(None)` leaves the field untouched.
pub type TransformationFn =
    Arc<dyn Fn(&Context, &str, &Value) -> Result<Option<Value>, RuleError> + Send + Sync>;

///
/// Registry
///
/// Named validations and transformations. Seeded with the built-ins on
/// construction; registration only ever adds or replaces (last write
/// wins). Registration needs `&mut self`, so a registry shared behind
/// `Arc` is frozen.
///

#[derive(Clone)]
pub struct Registry {
    validations: HashMap<String, ValidationFn>,
    transformations: HashMap<String, TransformationFn>,
}

impl Registry {
    /// A registry holding every built-in rule.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, validation) in rule::builtins() {
            registry.validations.insert(name.to_string(), validation);
        }

        registry
    }

    /// A registry with no rules at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validations: HashMap::new(),
            transformations: HashMap::new(),
        }
    }

    pub fn register_validation<F>(
        &mut self,
        name: &str,
        validation: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&Context, &str, &Value, &str) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        check_name(RuleKind::Validation, name)?;

        if rule::is_builtin(name) {
            tracing::warn!(rule = name, "validation shadows a built-in rule");
        } else {
            tracing::debug!(rule = name, "registered validation");
        }
        self.validations.insert(name.to_string(), Arc::new(validation));

        Ok(())
    }

    pub fn register_transformation<F>(
        &mut self,
        name: &str,
        transformation: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&Context, &str, &Value) -> Result<Option<Value>, RuleError> + Send + Sync + 'static,
    {
        check_name(RuleKind::Transformation, name)?;

        tracing::debug!(rule = name, "registered transformation");
        self.transformations
            .insert(name.to_string(), Arc::new(transformation));

        Ok(())
    }

    #[must_use]
    pub fn validation(&self, name: &str) -> Option<&ValidationFn> {
        self.validations.get(name)
    }

    #[must_use]
    pub fn transformation(&self, name: &str) -> Option<&TransformationFn> {
        self.transformations.get(name)
    }

    #[must_use]
    pub fn has_validation(&self, name: &str) -> bool {
        self.validations.contains_key(name)
    }

    #[must_use]
    pub fn has_transformation(&self, name: &str) -> bool {
        self.transformations.contains_key(name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut validations: Vec<_> = self.validations.keys().collect();
        let mut transformations: Vec<_> = self.transformations.keys().collect();
        validations.sort();
        transformations.sort();

        f.debug_struct("Registry")
            .field("validations", &validations)
            .field("transformations", &transformations)
            .finish()
    }
}

// A name must survive the tag parser unchanged to be reachable.
fn check_name(kind: RuleKind, name: &str) -> Result<(), RegistrationError> {
    if name.is_empty() {
        return Err(RegistrationError::EmptyName { kind });
    }
    if name.contains(',') || name.trim() != name {
        return Err(RegistrationError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn always(_: &Context, _: &str, _: &Value, _: &str) -> Result<bool, RuleError> {
        Ok(true)
    }

    #[test]
    fn new_registry_holds_builtins() {
        let registry = Registry::new();

        for name in [
            "required",
            "required_create",
            "required_update",
            "required_validate",
            "min",
            "max",
            "email",
        ] {
            assert!(registry.has_validation(name), "missing built-in {name}");
        }
        assert!(!Registry::empty().has_validation("required"));
    }

    #[test]
    fn empty_name_is_rejected_without_mutation() {
        let mut registry = Registry::new();

        let err = registry.register_validation("", always).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::EmptyName {
                kind: RuleKind::Validation
            }
        );
        assert!(registry.validation("").is_none());

        let err = registry
            .register_transformation("", |_, _, _| Ok(None))
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::EmptyName {
                kind: RuleKind::Transformation
            }
        );
        assert!(registry.transformation("").is_none());
    }

    #[test]
    fn names_that_cannot_appear_in_a_tag_are_rejected() {
        let mut registry = Registry::new();

        assert!(registry.register_validation("a,b", always).is_err());
        assert!(registry.register_validation(" padded", always).is_err());
        assert!(!registry.has_validation("a,b"));
    }

    #[test]
    fn last_registration_wins_and_can_shadow_builtins() {
        let mut registry = Registry::new();
        let ctx = Context::background();

        registry
            .register_validation("required", |_, _, _, _| Ok(false))
            .unwrap();
        let required = registry.validation("required").unwrap();
        assert!(!required(&ctx, "name", &Value::from("set"), "").unwrap());

        registry.register_validation("required", always).unwrap();
        let required = registry.validation("required").unwrap();
        assert!(required(&ctx, "name", &Value::Null, "").unwrap());
    }

    #[test]
    fn debug_lists_names_sorted() {
        let mut registry = Registry::empty();
        registry.register_validation("zeta", always).unwrap();
        registry.register_validation("alpha", always).unwrap();

        let rendered = format!("{registry:?}");
        assert!(rendered.find("alpha") < rendered.find("zeta"));
    }
}
