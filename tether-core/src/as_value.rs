use crate::{Error, Result, Value};
use std::any;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// used for query parameters and row decoding.
///
/// # Examples
/// ```rust
/// use tether_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int64(Some(42))));
/// let n: i32 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The NULL-like variant for this type, used to represent `None`.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    ///
    /// Accepts the canonical variant plus the representations a store is
    /// likely to hand back (for example an integer for a boolean column).
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

/// Object safe view of [`AsValue`] over a borrowed slot.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl<T: AsValue + Clone> ToValue for T {
    fn to_value(&self) -> Value {
        self.clone().as_value()
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {:?} into {}",
        value,
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_integer {
    ($($source:ty),+ $(,)?) => {
        $(
            impl AsValue for $source {
                fn as_empty_value() -> Value {
                    Value::Int64(None)
                }
                fn as_value(self) -> Value {
                    Value::Int64(Some(self as i64))
                }
                fn try_from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Int64(Some(v)) => <$source>::try_from(v).map_err(|_| {
                            Error::msg(format!(
                                "Value {v}: i64 is out of range for {}",
                                any::type_name::<Self>()
                            ))
                        }),
                        Value::Boolean(Some(v)) => Ok(v as _),
                        _ => Err(mismatch::<Self>(&value)),
                    }
                }
            }
        )+
    };
}

impl_as_value_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_as_value_float {
    ($($source:ty),+ $(,)?) => {
        $(
            impl AsValue for $source {
                fn as_empty_value() -> Value {
                    Value::Float64(None)
                }
                fn as_value(self) -> Value {
                    Value::Float64(Some(self as f64))
                }
                fn try_from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Float64(Some(v)) => Ok(v as _),
                        Value::Int64(Some(v)) => Ok(v as _),
                        _ => Err(mismatch::<Self>(&value)),
                    }
                }
            }
        )+
    };
}

impl_as_value_float!(f32, f64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Int64(Some(v)) => Ok(v != 0),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec()).map_err(Error::new),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            Value::Varchar(Some(v)) => Ok(v.into_bytes()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}
