use std::mem::discriminant;

/// Dynamically typed SQL value.
///
/// Typed variants carry an `Option` so that a NULL still remembers the kind of
/// column it belongs to (see [`AsValue::as_empty_value`](crate::AsValue::as_empty_value)).
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
}

impl Value {
    /// True for `Value::Null` and for every typed variant holding `None`.
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Boolean(None)
                | Value::Int64(None)
                | Value::Float64(None)
                | Value::Varchar(None)
                | Value::Blob(None)
        )
    }

    pub fn same_type(&self, other: &Self) -> bool {
        discriminant(self) == discriminant(other)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            _ => self.same_type(other),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}
