use crate::{AsValue, FieldError, FieldMap, FieldToken, NumericKind, TextKind, Value};
use std::{
    fmt::{self, Display},
    marker::PhantomData,
};

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Between,
    Like,
    In,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Between => "BETWEEN",
            Operator::Like => "LIKE",
            Operator::In => "IN",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the predicates of a query are joined. Applies to all of them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    pub fn separator(&self) -> &'static str {
        match self {
            Combinator::And => " AND ",
            Combinator::Or => " OR ",
        }
    }
}

/// What a condition compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The field slot a token was taken from.
    Slot(FieldToken),
    /// A column named explicitly.
    Column(String),
}

/// One comparison predicate not yet bound to a column name.
///
/// A condition on a field borrows the instance the field belongs to, so the
/// instance cannot move or drop while the condition is alive:
/// ```compile_fail
/// let condition = {
///     let age = 30_i64;
///     tether_core::field(&age).gt(1)
/// };
/// drop(condition);
/// ```
#[derive(Debug, Clone)]
pub struct Condition<'a> {
    target: Target,
    operator: Operator,
    operands: Vec<Value>,
    negated: bool,
    error: Option<FieldError>,
    _slot: PhantomData<&'a ()>,
}

impl<'a> Condition<'a> {
    fn new(target: Target, operator: Operator, operands: Vec<Value>) -> Self {
        Self {
            target,
            operator,
            operands,
            negated: false,
            error: None,
            _slot: PhantomData,
        }
    }

    /// Toggles the negation, `NOT` is written in front of the predicate.
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Error recorded while building, reported once the condition is resolved.
    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    /// Binds the condition to the column of the field it targets in `map`.
    pub fn resolve(self, map: &FieldMap) -> Result<Predicate, FieldError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let column = match &self.target {
            Target::Slot(token) => map.get(token).map(|slot| slot.column_name()),
            Target::Column(name) => map.by_column(name).map(|slot| slot.column_name()),
        };
        let Some(column) = column else {
            let target = match self.target {
                Target::Slot(token) => format!("the field at {:#x}", token.address()),
                Target::Column(name) => format!("column `{name}`"),
            };
            log::debug!("Can't resolve the condition on {} in `{}`", target, map.type_name());
            return Err(FieldError::CantGetName {
                record: map.type_name(),
                target,
            });
        };
        Ok(Predicate {
            column,
            operator: self.operator,
            operands: self.operands,
            negated: self.negated,
        })
    }
}

/// A condition bound to its column, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub operands: Vec<Value>,
    pub negated: bool,
}

/// Start of a condition on a field of type `T`.
///
/// The comparisons available depend on the field kind:
/// ```compile_fail
/// let name = String::new();
/// tether_core::field(&name).gt(String::from("a"));
/// ```
pub struct Where<'a, T> {
    target: Target,
    _type: PhantomData<(fn(T), &'a ())>,
}

/// Condition on the field `slot` of the instance that will be filtered.
pub fn field<T: AsValue + 'static>(slot: &T) -> Where<'_, T> {
    Where {
        target: Target::Slot(FieldToken::of(slot)),
        _type: PhantomData,
    }
}

/// Condition on a column named explicitly, checked against the record when the
/// query is built.
pub fn column<T: AsValue>(name: impl Into<String>) -> Where<'static, T> {
    Where {
        target: Target::Column(name.into()),
        _type: PhantomData,
    }
}

impl<'a, T: AsValue> Where<'a, T> {
    fn condition(self, operator: Operator, operands: Vec<Value>) -> Condition<'a> {
        Condition::new(self.target, operator, operands)
    }

    pub fn eq(self, value: T) -> Condition<'a> {
        self.condition(Operator::Eq, vec![value.as_value()])
    }

    pub fn ne(self, value: T) -> Condition<'a> {
        self.condition(Operator::Ne, vec![value.as_value()])
    }

    /// Membership test, an empty list makes the query fail.
    pub fn is_in(self, values: impl IntoIterator<Item = T>) -> Condition<'a> {
        let operands: Vec<_> = values.into_iter().map(AsValue::as_value).collect();
        let empty = operands.is_empty();
        let mut condition = self.condition(Operator::In, operands);
        if empty {
            condition.error = Some(FieldError::EmptyInList);
        }
        condition
    }
}

impl<'a, T: AsValue + NumericKind> Where<'a, T> {
    pub fn gt(self, value: T) -> Condition<'a> {
        self.condition(Operator::Gt, vec![value.as_value()])
    }

    pub fn lt(self, value: T) -> Condition<'a> {
        self.condition(Operator::Lt, vec![value.as_value()])
    }

    pub fn ge(self, value: T) -> Condition<'a> {
        self.condition(Operator::Ge, vec![value.as_value()])
    }

    pub fn le(self, value: T) -> Condition<'a> {
        self.condition(Operator::Le, vec![value.as_value()])
    }

    pub fn between(self, low: T, high: T) -> Condition<'a> {
        self.condition(Operator::Between, vec![low.as_value(), high.as_value()])
    }
}

impl<'a, T: AsValue + TextKind> Where<'a, T> {
    /// `LIKE` pattern match, `%` and `_` keep their wildcard meaning.
    pub fn like(self, pattern: impl Into<String>) -> Condition<'a> {
        self.condition(Operator::Like, vec![Value::Varchar(Some(pattern.into()))])
    }
}
