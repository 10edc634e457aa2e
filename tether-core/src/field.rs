use crate::{ColumnDef, FieldError, FieldMap, FieldToken};
use std::{any, borrow::Cow, fmt::Display};

/// Field types stored in a text column.
pub trait TextKind {}
/// Field types stored in an integer column.
pub trait IntegerKind {}
/// Field types stored in a floating point column.
pub trait RealKind {}
/// Field types stored in a boolean column.
pub trait BoolKind {}
/// Field types that support ordering comparisons (integer and real kinds).
pub trait NumericKind {}

macro_rules! impl_kind {
    ($kind:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl $kind for $ty {}
            impl $kind for Option<$ty> {}
        )+
    };
}

impl_kind!(TextKind: String);
impl_kind!(IntegerKind: i8, i16, i32, i64, u8, u16, u32);
impl_kind!(RealKind: f32, f64);
impl_kind!(BoolKind: bool);
impl_kind!(NumericKind: i8, i16, i32, i64, u8, u16, u32, f32, f64);

/// Column metadata bound to a field slot but not yet to a name.
///
/// The descriptor only remembers the identity of the slot it was built from.
/// It becomes a [`ColumnDef`] once resolved against the [`FieldMap`] of the
/// same instance, see [`SchemaDefinition::try_new`](crate::SchemaDefinition::try_new).
///
/// The slot must be passed by reference:
/// ```compile_fail
/// let name = String::new();
/// tether_core::text_field(name);
/// ```
/// and must have a matching kind:
/// ```compile_fail
/// let age = 0_i64;
/// tether_core::char_field(&age, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    token: FieldToken,
    type_name: &'static str,
    sql_type: Cow<'static, str>,
    nullable: bool,
    unique: bool,
    default: Option<String>,
}

impl FieldDescriptor {
    pub fn new<F: 'static>(slot: &F, sql_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            token: FieldToken::of(slot),
            type_name: any::type_name::<F>(),
            sql_type: sql_type.into(),
            nullable: false,
            unique: false,
            default: None,
        }
    }

    pub fn token(&self) -> FieldToken {
        self.token
    }

    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Literal the column defaults to. A value rendering to an empty string
    /// leaves the column without default.
    ///
    /// Boolean columns store `true`/`false` as `1`/`0`.
    pub fn default(mut self, value: impl Display) -> Self {
        let mut value = value.to_string();
        if self.sql_type == BOOLEAN {
            match value.to_ascii_lowercase().as_str() {
                "true" => value = "1".into(),
                "false" => value = "0".into(),
                _ => {}
            }
        }
        self.default = (!value.is_empty()).then_some(value);
        self
    }

    /// Names the column after the field of `map` this descriptor points to.
    pub fn resolve(self, map: &FieldMap) -> Result<ColumnDef, FieldError> {
        let Some(slot) = map.get(&self.token) else {
            log::debug!(
                "Descriptor for `{}` at {:#x} does not belong to `{}`",
                self.type_name,
                self.token.address(),
                map.type_name()
            );
            return Err(FieldError::FieldNotInStruct {
                record: map.type_name(),
                type_name: self.type_name,
                address: self.token.address(),
            });
        };
        Ok(ColumnDef {
            name: slot.column_name(),
            column_type: self.sql_type,
            nullable: self.nullable,
            unique: self.unique,
            default: self.default,
        })
    }
}

const BOOLEAN: &str = "BOOLEAN";

/// Text column limited to `max_len` characters: `VARCHAR(max_len)`.
pub fn char_field<F: TextKind + 'static>(slot: &F, max_len: u32) -> FieldDescriptor {
    FieldDescriptor::new(slot, format!("VARCHAR({max_len})"))
}

/// Text column sized for an email address: `VARCHAR(255)`.
pub fn email_field<F: TextKind + 'static>(slot: &F) -> FieldDescriptor {
    FieldDescriptor::new(slot, "VARCHAR(255)")
}

pub fn text_field<F: TextKind + 'static>(slot: &F) -> FieldDescriptor {
    FieldDescriptor::new(slot, "TEXT")
}

pub fn int_field<F: IntegerKind + 'static>(slot: &F) -> FieldDescriptor {
    FieldDescriptor::new(slot, "INT")
}

pub fn float_field<F: RealKind + 'static>(slot: &F) -> FieldDescriptor {
    FieldDescriptor::new(slot, "REAL")
}

pub fn bool_field<F: BoolKind + 'static>(slot: &F) -> FieldDescriptor {
    FieldDescriptor::new(slot, BOOLEAN)
}
