use crate::{AsValue, FieldError, ToValue, Value};
use std::{
    any::{self, TypeId},
    collections::HashMap,
    fmt::{self, Debug},
};

/// Identity of one field slot: the slot address and the type stored there.
///
/// A token only means something while the instance it was taken from is alive
/// and unmoved. [`FieldMap`] borrows the instance, which is what keeps a
/// resolution honest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldToken {
    address: usize,
    type_id: TypeId,
}

impl FieldToken {
    pub fn of<F: 'static>(slot: &F) -> Self {
        Self {
            address: slot as *const F as *const () as usize,
            type_id: TypeId::of::<F>(),
        }
    }
    pub fn address(&self) -> usize {
        self.address
    }
}

/// One addressable field of a live instance.
pub struct FieldSlot<'a> {
    token: FieldToken,
    name: &'static str,
    type_name: &'static str,
    value: &'a (dyn ToValue + Sync),
}

impl<'a> FieldSlot<'a> {
    pub fn new<F: AsValue + Clone + Sync + 'static>(name: &'static str, slot: &'a F) -> Self {
        Self {
            token: FieldToken::of(slot),
            name,
            type_name: any::type_name::<F>(),
            value: slot,
        }
    }
    pub fn token(&self) -> FieldToken {
        self.token
    }
    /// Field name as declared in the struct.
    pub fn name(&self) -> &'static str {
        self.name
    }
    /// Name of the column this field maps to.
    pub fn column_name(&self) -> String {
        self.name.to_lowercase()
    }
    /// Declared Rust type of the field.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
    /// Current content of the field.
    pub fn value(&self) -> Value {
        self.value.to_value()
    }
}

impl Debug for FieldSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSlot")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("address", &format_args!("{:#x}", self.token.address))
            .finish()
    }
}

/// Layout of a value as seen by the resolver.
pub enum Shape<'a> {
    /// A record, with one slot per addressable field in declaration order.
    Struct(Vec<FieldSlot<'a>>),
    /// A single value without fields.
    Scalar,
}

/// Walks the addressable fields of a value.
///
/// Implemented by `#[derive(Record)]` for records and here for scalars.
pub trait Reflect {
    fn shape(&self) -> Shape<'_>;
}

macro_rules! impl_reflect_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar
                }
            }
        )+
    };
}

impl_reflect_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, String, str, Vec<u8>);

impl<T: Reflect> Reflect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar
    }
}

/// Per-instance lookup from [`FieldToken`] to the field it identifies.
///
/// The map borrows the instance it was built from, so it can never be used
/// after that instance moved or was dropped.
///
/// The instance must be passed by reference:
/// ```compile_fail
/// let age = 42_i64;
/// tether_core::FieldMap::build(age);
/// ```
#[derive(Debug)]
pub struct FieldMap<'a> {
    type_name: &'static str,
    slots: Vec<FieldSlot<'a>>,
    index: HashMap<FieldToken, usize>,
}

impl<'a> FieldMap<'a> {
    pub fn build<T: Reflect + ?Sized>(value: &'a T) -> Result<Self, FieldError> {
        let type_name = any::type_name::<T>();
        let Shape::Struct(slots) = value.shape() else {
            return Err(FieldError::NotAStruct { type_name });
        };
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.token, i))
            .collect();
        Ok(Self {
            type_name,
            slots,
            index,
        })
    }

    /// Name of the type this map was built from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, token: &FieldToken) -> Option<&FieldSlot<'a>> {
        self.index.get(token).map(|i| &self.slots[*i])
    }

    pub fn by_name(&self, name: &str) -> Option<&FieldSlot<'a>> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    pub fn by_column(&self, column: &str) -> Option<&FieldSlot<'a>> {
        self.slots
            .iter()
            .find(|slot| slot.name.eq_ignore_ascii_case(column))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldSlot<'a>> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldMap, FieldSlot, FieldToken, Reflect, Shape};
    use crate::{FieldError, Value};

    #[derive(Default)]
    struct Sample {
        f0: String,
        f1: i32,
        f2: Option<String>,
        f3: f64,
        _skipped: Vec<u32>,
    }

    impl Reflect for Sample {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(vec![
                FieldSlot::new("f0", &self.f0),
                FieldSlot::new("f1", &self.f1),
                FieldSlot::new("f2", &self.f2),
                FieldSlot::new("f3", &self.f3),
            ])
        }
    }

    #[test]
    fn token_identity() {
        let sample = Sample::default();
        assert_eq!(FieldToken::of(&sample.f1), FieldToken::of(&sample.f1));
        assert_ne!(FieldToken::of(&sample.f0), FieldToken::of(&sample.f1));
        assert_eq!(
            FieldToken::of(&sample.f3).address(),
            &sample.f3 as *const f64 as usize
        );
    }

    #[test]
    fn map_fields() {
        let sample = Sample {
            f1: 12,
            ..Default::default()
        };
        let map = FieldMap::build(&sample).expect("Sample is a struct");
        assert_eq!(map.len(), 4);
        assert!(map.type_name().ends_with("Sample"));

        let f1 = map.get(&FieldToken::of(&sample.f1)).expect("f1 is mapped");
        assert_eq!(f1.name(), "f1");
        assert_eq!(f1.type_name(), "i32");
        assert_eq!(f1.value(), Value::Int64(Some(12)));

        let f2 = map.get(&FieldToken::of(&sample.f2)).expect("f2 is mapped");
        assert_eq!(f2.name(), "f2");
        assert_eq!(f2.value(), Value::Varchar(None));

        assert!(map.get(&FieldToken::of(&sample._skipped)).is_none());
        assert_eq!(map.by_name("f3").map(|v| v.name()), Some("f3"));
        assert_eq!(map.by_column("F0").map(|v| v.name()), Some("f0"));
        assert!(map.by_name("missing").is_none());
    }

    #[test]
    fn map_other_instance() {
        let a = Sample::default();
        let b = Sample::default();
        let map = FieldMap::build(&b).expect("Sample is a struct");
        assert!(map.get(&FieldToken::of(&a.f1)).is_none());
        assert!(map.get(&FieldToken::of(&b.f1)).is_some());
    }

    #[test]
    fn map_scalar() {
        let value = String::from("test");
        assert!(matches!(
            FieldMap::build(&value),
            Err(FieldError::NotAStruct { type_name: "alloc::string::String" })
        ));
        assert!(matches!(
            FieldMap::build(&5_i64),
            Err(FieldError::NotAStruct { .. })
        ));
    }
}
