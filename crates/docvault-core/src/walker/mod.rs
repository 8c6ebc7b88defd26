//! Field walker: applies tag rules to a record and builds its output
//! document.

mod path;


use crate::{
    context::Context,
    error::{Error, ErrorCode, FieldError, FieldSite},
    options::{RequiredStatus, ValidationOpts},
    reflect::{FieldDescriptor, Kind, Record, Reflect},
    registry::Registry,
    tag::{Token, parse_tag},
    value::{Document, Value},
};
use path::{PathSegment, render_path};
use std::collections::BTreeMap;

///
/// Walker
///
/// One synchronous pass over a record. Stops at the first error; the
/// document is only returned when every field succeeded.
///

pub(crate) struct Walker<'a> {
    registry: &'a Registry,
    opts: &'a ValidationOpts,
    ctx: &'a Context,
}

impl<'a> Walker<'a> {
    pub(crate) const fn new(
        registry: &'a Registry,
        opts: &'a ValidationOpts,
        ctx: &'a Context,
    ) -> Self {
        Self {
            registry,
            opts,
            ctx,
        }
    }

    /// Walk every tagged field of `record` in declaration order.
    pub(crate) fn walk(&self, record: &mut dyn Record, parent: &str) -> Result<Document, Error> {
        let mut doc = Document::new();

        for field in record.fields_mut() {
            let descriptor = field.descriptor;
            // an empty tag counts as no tag
            let Some(raw) = descriptor.tag.filter(|raw| !raw.is_empty()) else {
                continue;
            };
            let rules = parse_tag(raw);
            if rules.is_ignored() {
                continue;
            }

            self.ctx.check()?;

            let name = rules.name().unwrap_or(descriptor.ident);
            let path = render_path(parent, PathSegment::Field(name));
            let value = field.value;

            if !value.kind().is_supported() {
                let site = site(descriptor, name, &path, value);
                return Err(FieldError::new(ErrorCode::UnsupportedFieldType, &site, "", "").into());
            }

            let omit = rules.omissions().any(|omission| self.opts.honors(omission));
            if omit && !value.has_value() && !self.opts.is_empty_allowed(&path) {
                tracing::debug!(path = %path, "omitting empty field");
                continue;
            }

            let tokens = rules.without_omissions();
            let field = FieldRef {
                descriptor,
                name,
                path: &path,
            };

            // rules see through one level of non-null pointer
            let output = match value.pointee_mut() {
                Some(target) => self.visit(target, &field, &tokens)?,
                None => self.visit(value, &field, &tokens)?,
            };

            doc.insert(name.to_string(), output);
        }

        Ok(doc)
    }

    fn visit(
        &self,
        target: &mut dyn Reflect,
        field: &FieldRef<'_>,
        tokens: &[&str],
    ) -> Result<Value, Error> {
        if !self.opts.skip_validation() {
            self.apply_rules(target, field, tokens)?;
        }

        self.finalize(target, field.path)
    }

    // Run each token in tag order against the field's current value.
    fn apply_rules(
        &self,
        target: &mut dyn Reflect,
        field: &FieldRef<'_>,
        tokens: &[&str],
    ) -> Result<(), Error> {
        let path = field.path;
        let mut current = target.to_value();

        for raw in tokens {
            let token = Token::parse(raw);
            let status = match token {
                Token::Transform(_) => RequiredStatus::NotRequired,
                Token::Rule { name, .. } => self.opts.required_status(name),
            };

            match status {
                RequiredStatus::Skipped => continue,
                RequiredStatus::NotRequired if !target.has_value() => continue,
                _ => {}
            }

            let site = FieldSite {
                field: field.name.to_string(),
                struct_field: field.descriptor.ident,
                path: path.to_string(),
                value: current.clone(),
                kind: target.kind(),
                type_name: target.type_name(),
            };

            match token {
                Token::Transform(name) => {
                    let Some(transformation) = self.registry.transformation(name) else {
                        return Err(
                            FieldError::new(ErrorCode::UnknownTransformation, &site, raw, "")
                                .into(),
                        );
                    };

                    tracing::trace!(path = %path, rule = name, "applying transformation");
                    let replacement = transformation(self.ctx, path, &current)
                        .map_err(|err| transformation_failure(name, &site, raw, err))?;

                    if let Some(replacement) = replacement {
                        target.assign(replacement).map_err(|err| {
                            FieldError::new(ErrorCode::FailedTransformation, &site, raw, "")
                                .with_source(Box::new(err))
                        })?;
                        current = target.to_value();
                    }
                }
                Token::Rule { name, param } => {
                    let Some(validation) = self.registry.validation(name) else {
                        return Err(
                            FieldError::new(ErrorCode::UnknownValidation, &site, name, param)
                                .into(),
                        );
                    };

                    tracing::trace!(path = %path, rule = name, param, "applying validation");
                    let passed = validation(self.ctx, path, &current, param)
                        .map_err(|err| Error::from_rule(name, path, err))?;

                    if !passed {
                        return Err(
                            FieldError::new(ErrorCode::FailedValidation, &site, name, param).into(),
                        );
                    }
                }
            }
        }

        Ok(())
    }

    // Convert a (possibly transformed) field into its stored form.
    fn finalize(&self, target: &mut dyn Reflect, path: &str) -> Result<Value, Error> {
        match target.kind() {
            Kind::Struct => match target.as_record_mut() {
                Some(record) => Ok(self.walk(record, path)?.into()),
                None => Ok(target.to_value().into_storable()),
            },
            Kind::Map => {
                let mut entries = BTreeMap::new();
                for (key, entry) in target.entries_mut() {
                    let entry_path = render_path(path, PathSegment::Field(&key));
                    let value = self.finalize(entry, &entry_path)?;
                    entries.insert(key, value);
                }

                Ok(Value::Map(entries))
            }
            Kind::Slice | Kind::Array => {
                let mut items = Vec::new();
                for (index, element) in target.elements_mut().into_iter().enumerate() {
                    let element_path = render_path(path, PathSegment::Index(index));
                    items.push(self.finalize(element, &element_path)?);
                }

                Ok(Value::List(items))
            }
            Kind::Pointer => match target.pointee_mut() {
                Some(inner) => self.finalize(inner, path),
                None => Ok(Value::Null),
            },
            Kind::Dynamic => Ok(target.to_value().into_storable()),
            Kind::Chan | Kind::Func => {
                let site = FieldSite {
                    field: path.to_string(),
                    struct_field: "",
                    path: path.to_string(),
                    value: Value::Null,
                    kind: target.kind(),
                    type_name: target.type_name(),
                };

                Err(FieldError::new(ErrorCode::UnsupportedFieldType, &site, "", "").into())
            }
            Kind::Bool | Kind::Int | Kind::Uint | Kind::Float | Kind::String | Kind::Time => {
                Ok(target.to_value())
            }
        }
    }
}

///
/// FieldRef
/// Identity of the record field currently being walked.
///

struct FieldRef<'a> {
    descriptor: &'static FieldDescriptor,
    name: &'a str,
    path: &'a str,
}

fn site(descriptor: &FieldDescriptor, name: &str, path: &str, value: &dyn Reflect) -> FieldSite {
    FieldSite {
        field: name.to_string(),
        struct_field: descriptor.ident,
        path: path.to_string(),
        value: value.to_value(),
        kind: value.kind(),
        type_name: value.type_name(),
    }
}

// Configuration mistakes and cancellation keep their own variants; any
// other transformation error becomes a field failure carrying the source.
fn transformation_failure(
    name: &str,
    site: &FieldSite,
    raw: &str,
    err: crate::error::RuleError,
) -> Error {
    match Error::from_rule(name, &site.path, err) {
        Error::Rule { source, .. } => {
            FieldError::new(ErrorCode::FailedTransformation, site, raw, "")
                .with_source(source)
                .into()
        }
        other => other,
    }
}
