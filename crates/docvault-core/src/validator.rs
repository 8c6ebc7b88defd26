//! Entry point tying the registry and configuration to the walker.

use crate::{
    config::Config,
    context::Context,
    error::{Error, RuleError},
    options::{Method, Options, ValidationOpts},
    reflect::{Record, Reflect},
    registry::Registry,
    value::{Document, Value},
    walker::Walker,
};

///
/// Validator
///
/// Owns the rule registry and the configured defaults. Register custom
/// rules first, then share the validator (for example behind `Arc`);
/// validation only needs `&self`.
///

#[derive(Clone, Debug, Default)]
pub struct Validator {
    registry: Registry,
    config: Config,
}

impl Validator {
    /// A validator with every built-in rule and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            registry: Registry::new(),
            config,
        }
    }

    #[must_use]
    pub const fn with_registry(registry: Registry, config: Config) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn register_validation<F>(&mut self, name: &str, validation: F) -> Result<(), Error>
    where
        F: Fn(&Context, &str, &Value, &str) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        self.registry.register_validation(name, validation)?;

        Ok(())
    }

    pub fn register_transformation<F>(&mut self, name: &str, transformation: F) -> Result<(), Error>
    where
        F: Fn(&Context, &str, &Value) -> Result<Option<Value>, RuleError> + Send + Sync + 'static,
    {
        self.registry
            .register_transformation(name, transformation)?;

        Ok(())
    }

    /// Resolve per-call options against the configured defaults.
    #[must_use]
    pub fn resolve(&self, method: Method, options: &Options) -> ValidationOpts {
        options.resolve(method, &self.config)
    }

    /// Validate and transform `record` in place, returning the document
    /// to store. Transformations are written back into the record even
    /// when a later rule fails.
    pub fn validate<R: Record>(
        &self,
        ctx: &Context,
        record: &mut R,
        opts: &ValidationOpts,
    ) -> Result<Document, Error> {
        Walker::new(&self.registry, opts, ctx).walk(record, "")
    }

    /// Validate a value whose shape is only known at runtime; anything
    /// other than a record is rejected before a field is read.
    pub fn validate_dyn(
        &self,
        ctx: &Context,
        data: &mut dyn Reflect,
        opts: &ValidationOpts,
    ) -> Result<Document, Error> {
        let (type_name, kind) = (data.type_name(), data.kind());
        let Some(record) = data.as_record_mut() else {
            return Err(Error::Shape { type_name, kind });
        };

        Walker::new(&self.registry, opts, ctx).walk(record, "")
    }

    /// Resolve `options` for `method` and validate in one step.
    pub fn validate_with<R: Record>(
        &self,
        ctx: &Context,
        record: &mut R,
        method: Method,
        options: &Options,
    ) -> Result<Document, Error> {
        let opts = self.resolve(method, options);

        self.validate(ctx, record, &opts)
    }
}
