//! Object-safe reflection over record fields.

mod impls;

#[cfg(test)]
mod tests;

use crate::value::Value;
use std::{collections::BTreeMap, fmt};
use thiserror::Error as ThisError;

// ============================================================================
// Kind
// ============================================================================

///
/// Kind
/// Runtime classification of a reflected value.
///
/// `Chan` and `Func` exist so records can carry such fields; the walker
/// rejects them as soon as it reaches one.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Time,
    Struct,
    Map,
    Slice,
    Array,
    Pointer,
    Dynamic,
    Chan,
    Func,
}

impl Kind {
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Chan | Self::Func)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Time => "time",
            Self::Struct => "struct",
            Self::Map => "map",
            Self::Slice => "slice",
            Self::Array => "array",
            Self::Pointer => "ptr",
            Self::Dynamic => "dynamic",
            Self::Chan => "chan",
            Self::Func => "func",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Reflect
// ============================================================================

///
/// Reflect
///
/// Object-safe view over one field value. Implemented here for scalars,
/// text, timestamps, pointers, sequences and string-keyed maps, and
/// generated for records by `#[derive(Record)]`.
///
/// Container accessors default to "none"; only the matching kinds
/// override them.
///

pub trait Reflect {
    fn kind(&self) -> Kind;

    fn type_name(&self) -> &'static str;

    /// False when the value is its kind's zero-equivalent.
    fn has_value(&self) -> bool;

    fn to_value(&self) -> Value;

    /// Overwrite the value in place from a transformation result.
    fn assign(&mut self, value: Value) -> Result<(), AssignError>;

    /// The pointee of a non-null pointer.
    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
        None
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Reflect> {
        Vec::new()
    }

    /// Map entries, sorted by key.
    fn entries_mut(&mut self) -> Vec<(String, &mut dyn Reflect)> {
        Vec::new()
    }
}

///
/// FromValue
/// Build an owned value back out of a [`Value`].
///

pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, AssignError>;
}

// ============================================================================
// Record
// ============================================================================

///
/// Record
///
/// A struct whose fields can be walked in declaration order.
/// The descriptor table is static and built once per type.
///

pub trait Record: Reflect {
    fn descriptors(&self) -> &'static [FieldDescriptor];

    /// Every field, tagged or not, paired with its descriptor.
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}

///
/// FieldDescriptor
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub ident: &'static str,
    pub tag: Option<&'static str>,
    pub type_name: &'static str,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn new(
        ident: &'static str,
        tag: Option<&'static str>,
        type_name: &'static str,
    ) -> Self {
        Self {
            ident,
            tag,
            type_name,
        }
    }
}

///
/// FieldMut
///

pub struct FieldMut<'a> {
    pub descriptor: &'static FieldDescriptor,
    pub value: &'a mut dyn Reflect,
}

impl<'a> FieldMut<'a> {
    #[must_use]
    pub fn new(descriptor: &'static FieldDescriptor, value: &'a mut dyn Reflect) -> Self {
        Self { descriptor, value }
    }
}

impl fmt::Debug for FieldMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMut")
            .field("descriptor", self.descriptor)
            .field("kind", &self.value.kind())
            .finish()
    }
}

///
/// FieldSource
///
/// Helper for generated `FromValue` impls: unpacks a struct snapshot or a
/// map into named slots and hands them out one field at a time.
///

#[derive(Debug)]
pub struct FieldSource {
    type_name: &'static str,
    entries: BTreeMap<String, Value>,
}

impl FieldSource {
    pub fn new(type_name: &'static str, value: Value) -> Result<Self, AssignError> {
        let entries = match value {
            Value::Struct(record) => record
                .fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            Value::Map(entries) => entries,
            other => return Err(AssignError::mismatch(type_name, &other)),
        };

        Ok(Self { type_name, entries })
    }

    pub fn take<T: FromValue>(&mut self, name: &'static str) -> Result<T, AssignError> {
        let value = self.remove(name).ok_or(AssignError::MissingField {
            type_name: self.type_name,
            field: name,
        })?;

        T::from_value(value)
    }

    /// The incoming value for `name`, if the source carries one.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }
}

/// Write a struct snapshot or map back into `record` field by field.
///
/// Fields missing from `value`, or whose incoming value equals the
/// current one, are left untouched. This keeps ignored and unsupported
/// fields out of the way of a transformation that only rewrites the rest.
pub fn assign_fields(
    record: &mut dyn Record,
    type_name: &'static str,
    value: Value,
) -> Result<(), AssignError> {
    let mut source = FieldSource::new(type_name, value)?;

    for field in record.fields_mut() {
        let Some(incoming) = source.remove(field.descriptor.ident) else {
            continue;
        };
        if incoming != field.value.to_value() {
            field.value.assign(incoming)?;
        }
    }

    Ok(())
}

// ============================================================================
// AssignError
// ============================================================================

///
/// AssignError
/// A transformation result could not be written back into a field.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AssignError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} is out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    #[error("expected {expected} elements, found {found}")]
    Length { expected: usize, found: usize },

    #[error("missing field '{field}' for {type_name}")]
    MissingField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("{0} values cannot be assigned")]
    Unsupported(&'static str),
}

impl AssignError {
    #[must_use]
    pub const fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self::Mismatch {
            expected,
            found: found.label(),
        }
    }

    pub fn out_of_range(target: &'static str, value: impl fmt::Display) -> Self {
        Self::OutOfRange {
            target,
            value: value.to_string(),
        }
    }
}
