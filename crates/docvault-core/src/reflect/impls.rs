use crate::{
    reflect::{AssignError, FromValue, Kind, Reflect},
    value::Value,
};
use chrono::{DateTime, Utc};
use std::{
    any::type_name,
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
    sync::mpsc::{Receiver, Sender, SyncSender},
};

// ============================================================================
// Scalars
// ============================================================================

// impl_reflect_scalar
macro_rules! impl_reflect_scalar {
    ( $( $type:ty => $kind:ident ),* $(,)? ) => {
        $(
            impl Reflect for $type {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn type_name(&self) -> &'static str {
                    stringify!($type)
                }

                fn has_value(&self) -> bool {
                    self.to_value().has_value()
                }

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }

                fn assign(&mut self, value: Value) -> Result<(), AssignError> {
                    *self = Self::from_value(value)?;
                    Ok(())
                }
            }
        )*
    };
}

impl_reflect_scalar!(
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
);

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(AssignError::mismatch("bool", &other)),
        }
    }
}

// impl_from_value_int
// Signed and unsigned integers accept either integer variant as long as
// the value fits.
macro_rules! impl_from_value_int {
    ( $( $type:ty ),* $(,)? ) => {
        $(
            impl FromValue for $type {
                fn from_value(value: Value) -> Result<Self, AssignError> {
                    match value {
                        Value::Int(v) => Self::try_from(v)
                            .map_err(|_| AssignError::out_of_range(stringify!($type), v)),
                        Value::Uint(v) => Self::try_from(v)
                            .map_err(|_| AssignError::out_of_range(stringify!($type), v)),
                        other => Err(AssignError::mismatch(stringify!($type), &other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as Self),
            Value::Uint(v) => Ok(v as Self),
            other => Err(AssignError::mismatch("f64", &other)),
        }
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, AssignError> {
        let wide = f64::from_value(value).map_err(|err| match err {
            AssignError::Mismatch { found, .. } => AssignError::Mismatch {
                expected: "f32",
                found,
            },
            other => other,
        })?;

        if wide.is_finite() && wide.abs() > f64::from(Self::MAX) {
            return Err(AssignError::out_of_range("f32", wide));
        }

        Ok(wide as Self)
    }
}

// usize / isize have no lossless conversion into the 64-bit variants on
// every target, so they convert through try_from.
macro_rules! impl_reflect_size {
    ( $( $type:ty => $kind:ident as $wide:ty ),* $(,)? ) => {
        $(
            impl Reflect for $type {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn type_name(&self) -> &'static str {
                    stringify!($type)
                }

                fn has_value(&self) -> bool {
                    *self != 0
                }

                fn to_value(&self) -> Value {
                    match <$wide>::try_from(*self) {
                        Ok(v) => Value::$kind(v),
                        Err(_) => Value::$kind(<$wide>::MAX),
                    }
                }

                fn assign(&mut self, value: Value) -> Result<(), AssignError> {
                    *self = Self::from_value(value)?;
                    Ok(())
                }
            }

            impl FromValue for $type {
                fn from_value(value: Value) -> Result<Self, AssignError> {
                    match value {
                        Value::Int(v) => Self::try_from(v)
                            .map_err(|_| AssignError::out_of_range(stringify!($type), v)),
                        Value::Uint(v) => Self::try_from(v)
                            .map_err(|_| AssignError::out_of_range(stringify!($type), v)),
                        other => Err(AssignError::mismatch(stringify!($type), &other)),
                    }
                }
            }
        )*
    };
}

impl_reflect_size!(isize => Int as i64, usize => Uint as u64);

// ============================================================================
// Text & time
// ============================================================================

impl Reflect for String {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn type_name(&self) -> &'static str {
        "String"
    }

    fn has_value(&self) -> bool {
        !self.is_empty()
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        *self = Self::from_value(value)?;
        Ok(())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(AssignError::mismatch("String", &other)),
        }
    }
}

impl Reflect for DateTime<Utc> {
    fn kind(&self) -> Kind {
        Kind::Time
    }

    fn type_name(&self) -> &'static str {
        "DateTime<Utc>"
    }

    fn has_value(&self) -> bool {
        *self != Self::default()
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        *self = Self::from_value(value)?;
        Ok(())
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Timestamp(v) => Ok(v),
            Value::Text(v) => DateTime::parse_from_rfc3339(&v)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| AssignError::out_of_range("DateTime<Utc>", v)),
            other => Err(AssignError::mismatch("DateTime<Utc>", &other)),
        }
    }
}

// ============================================================================
// Dynamic
// ============================================================================

impl Reflect for Value {
    fn kind(&self) -> Kind {
        Kind::Dynamic
    }

    fn type_name(&self) -> &'static str {
        "Value"
    }

    fn has_value(&self) -> bool {
        Self::has_value(self)
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        *self = value;
        Ok(())
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        Ok(value)
    }
}

// ============================================================================
// Pointers
// ============================================================================

impl<T: Reflect + FromValue> Reflect for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn has_value(&self) -> bool {
        self.is_some()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Reflect::to_value)
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }

        match self {
            Some(inner) => inner.assign(value),
            None => {
                *self = Some(T::from_value(value)?);
                Ok(())
            }
        }
    }

    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|inner| inner as &mut dyn Reflect)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: Reflect + FromValue> Reflect for Box<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn has_value(&self) -> bool {
        true
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        (**self).assign(value)
    }

    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
        Some(&mut **self)
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        T::from_value(value).map(Self::new)
    }
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: Reflect + FromValue> Reflect for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Slice
    }

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn has_value(&self) -> bool {
        !self.is_empty()
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Reflect::to_value).collect())
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Reflect> {
        self.iter_mut().map(|item| item as &mut dyn Reflect).collect()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::List(items) | Value::Array(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            other => Err(AssignError::mismatch("list", &other)),
        }
    }
}

impl<T: Reflect + FromValue, const N: usize> Reflect for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Array
    }

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn has_value(&self) -> bool {
        self.iter().any(Reflect::has_value)
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(Reflect::to_value).collect())
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        let items = match value {
            Value::List(items) | Value::Array(items) => items,
            other => return Err(AssignError::mismatch("list", &other)),
        };
        if items.len() != N {
            return Err(AssignError::Length {
                expected: N,
                found: items.len(),
            });
        }

        for (slot, item) in self.iter_mut().zip(items) {
            slot.assign(item)?;
        }

        Ok(())
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Reflect> {
        self.iter_mut().map(|item| item as &mut dyn Reflect).collect()
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        let items = Vec::<T>::from_value(value)?;
        let found = items.len();

        items
            .try_into()
            .map_err(|_| AssignError::Length { expected: N, found })
    }
}

// ============================================================================
// Maps
// ============================================================================

impl<V: Reflect + FromValue> Reflect for BTreeMap<String, V> {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn has_value(&self) -> bool {
        !self.is_empty()
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn entries_mut(&mut self) -> Vec<(String, &mut dyn Reflect)> {
        self.iter_mut()
            .map(|(k, v)| (k.clone(), v as &mut dyn Reflect))
            .collect()
    }
}

impl<V: FromValue> FromValue for BTreeMap<String, V> {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| V::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(AssignError::mismatch("map", &other)),
        }
    }
}

impl<V, S> Reflect for HashMap<String, V, S>
where
    V: Reflect + FromValue,
    S: BuildHasher + Default,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn has_value(&self) -> bool {
        !self.is_empty()
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn assign(&mut self, value: Value) -> Result<(), AssignError> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn entries_mut(&mut self) -> Vec<(String, &mut dyn Reflect)> {
        let mut entries: Vec<(String, &mut dyn Reflect)> = self
            .iter_mut()
            .map(|(k, v)| (k.clone(), v as &mut dyn Reflect))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        entries
    }
}

impl<V, S> FromValue for HashMap<String, V, S>
where
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| V::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(AssignError::mismatch("map", &other)),
        }
    }
}

// ============================================================================
// Unsupported kinds
// ============================================================================

// impl_reflect_unsupported
// These carry no storable value. They exist so a record can declare them
// and still be walked; the walker fails on the field.
macro_rules! impl_reflect_unsupported {
    ( $kind:ident => $( [$($generics:tt)*] $type:ty ),* $(,)? ) => {
        $(
            impl<$($generics)*> Reflect for $type {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn type_name(&self) -> &'static str {
                    type_name::<Self>()
                }

                fn has_value(&self) -> bool {
                    true
                }

                fn to_value(&self) -> Value {
                    Value::Null
                }

                fn assign(&mut self, _: Value) -> Result<(), AssignError> {
                    Err(AssignError::Unsupported(Kind::$kind.as_str()))
                }
            }

            impl<$($generics)*> FromValue for $type {
                fn from_value(_: Value) -> Result<Self, AssignError> {
                    Err(AssignError::Unsupported(Kind::$kind.as_str()))
                }
            }
        )*
    };
}

impl_reflect_unsupported!(Chan =>
    [T] Sender<T>,
    [T] SyncSender<T>,
    [T] Receiver<T>,
);

impl_reflect_unsupported!(Func =>
    [R] fn() -> R,
    [A, R] fn(A) -> R,
    [A, B, R] fn(A, B) -> R,
);
