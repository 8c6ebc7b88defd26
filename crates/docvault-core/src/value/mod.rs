//! Snapshot values and the output document.

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use derive_more::{Deref, DerefMut, IntoIterator};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::collections::BTreeMap;

///
/// Value
///
/// Kind-level snapshot of a reflected field, and the element type of an
/// output [`Document`].
///
/// Null      → an absent pointer (`Option::None`) or an empty dynamic value.
/// Array     → fixed-length sequence; empty when every element is, not by
///             its length. Stored as a list.
/// Struct    → snapshot of a nested record, keyed by native field names;
///             never emitted into an output document.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    List(Vec<Self>),
    Array(Vec<Self>),
    Map(BTreeMap<String, Self>),
    Struct(StructValue),
}

impl Value {
    /// Type-aware zero check shared by `required` and the omission
    /// directives.
    #[must_use]
    pub fn has_value(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(v) => *v,
            Self::Int(v) => *v != 0,
            Self::Uint(v) => *v != 0,
            Self::Float(v) => v.to_bits() != 0,
            Self::Text(v) => !v.is_empty(),
            Self::Timestamp(v) => *v != DateTime::<Utc>::default(),
            Self::List(v) => !v.is_empty(),
            Self::Array(v) => v.iter().any(Self::has_value),
            Self::Map(v) => !v.is_empty(),
            Self::Struct(v) => v.fields.iter().any(|(_, field)| field.has_value()),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short label of the variant, used in diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::List(_) => "list",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
        }
    }

    /// Length for text (in chars), sequences and maps.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Text(v) => Some(v.chars().count()),
            Self::List(v) | Self::Array(v) => Some(v.len()),
            Self::Map(v) => Some(v.len()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Replace struct snapshots with maps and arrays with lists so the
    /// value can be stored.
    #[must_use]
    pub fn into_storable(self) -> Self {
        match self {
            Self::List(items) | Self::Array(items) => {
                Self::List(items.into_iter().map(Self::into_storable).collect())
            }
            Self::Map(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_storable()))
                    .collect(),
            ),
            Self::Struct(record) => Self::Map(
                record
                    .fields
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.into_storable()))
                    .collect(),
            ),
            other => other,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Uint(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Text(v) => serializer.serialize_str(v),
            Self::Timestamp(v) => v.serialize(serializer),
            Self::List(v) | Self::Array(v) => v.serialize(serializer),
            Self::Map(v) => v.serialize(serializer),
            Self::Struct(v) => {
                let mut map = serializer.serialize_map(Some(v.fields.len()))?;
                for (name, field) in &v.fields {
                    map.serialize_entry(name, field)?;
                }
                map.end()
            }
        }
    }
}

// impl_value_from
macro_rules! impl_value_from {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from!(
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    f32 => Float,
    f64 => Float,
    String => Text,
    DateTime<Utc> => Timestamp,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Self::Map(doc.0)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

///
/// StructValue
///

#[derive(Clone, Debug, PartialEq)]
pub struct StructValue {
    pub type_name: &'static str,
    pub fields: Vec<(&'static str, Value)>,
}

impl StructValue {
    #[must_use]
    pub const fn new(type_name: &'static str, fields: Vec<(&'static str, Value)>) -> Self {
        Self { type_name, fields }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }
}

///
/// Document
///
/// Output of a validation call: output field name → processed value.
/// Keys are unique per nesting level and iteration order carries no
/// meaning.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, IntoIterator, PartialEq, Serialize)]
#[into_iterator(owned, ref, ref_mut)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }

    /// Resolve a field path given as segments (`["address", "city"]`).
    /// Numeric segments index into lists.
    #[must_use]
    pub fn lookup<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        let (first, rest) = segments.split_first()?;
        let mut current = self.0.get(first.as_ref())?;

        for segment in rest {
            let segment = segment.as_ref();
            current = match current {
                Value::Map(entries) => entries.get(segment)?,
                Value::List(items) | Value::Array(items) => {
                    items.get(segment.parse::<usize>().ok()?)?
                }
                _ => return None,
            };
        }

        Some(current)
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
