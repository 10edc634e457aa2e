use crate::{Value, truncate_long};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// Parameter attached to a [`Statement`].
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Bound to the next `?` placeholder.
    Positional(Value),
    /// Bound to the `:name` placeholder.
    Named(String, Value),
}

/// SQL text with its parameters, what crosses the store boundary.
///
/// A statement without bindings may contain several `;` separated commands.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub bindings: Vec<Binding>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    /// Append a positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.bindings.push(Binding::Positional(value.into()));
        self
    }

    /// Append a parameter for the `:name` placeholder, `name` is given without colon.
    pub fn bind_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.push(Binding::Named(name.into(), value.into()));
        self
    }

    pub fn has_bindings(&self) -> bool {
        !self.bindings.is_empty()
    }
}

impl From<String> for Statement {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Statement {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Rowid of the last inserted row, when the store reports one.
    pub last_affected_id: Option<i64>,
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

/// Shared column name list.
pub type RowNames = Arc<[String]>;
/// Row values aligned with `RowNames`.
pub type Row = Box<[Value]>;

/// A result row with its column labels.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v.eq_ignore_ascii_case(name))
            .map(|i| &self.values[i])
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, RowLabeled, RowsAffected, Statement};
    use crate::Value;

    #[test]
    fn bindings() {
        let statement = Statement::new("SELECT * FROM person WHERE id = ?").bind(5_i64);
        assert_eq!(statement.bindings, [Binding::Positional(Value::Int64(Some(5)))]);

        let statement = Statement::from("INSERT INTO t (a) VALUES (:a)").bind_named("a", "x");
        assert_eq!(
            statement.bindings,
            [Binding::Named("a".into(), Value::Varchar(Some("x".into())))]
        );
        assert!(!Statement::from(String::from("BEGIN;")).has_bindings());
    }

    #[test]
    fn display_multibyte() {
        let sql = format!(
            "SELECT * FROM person WHERE ( name LIKE '{}é%')",
            "a".repeat(456)
        );
        let shown = Statement::new(sql.as_str()).to_string();
        // 'é' takes bytes 496..498
        assert!(shown.ends_with("..."));
        assert!(sql.starts_with(shown.trim_end_matches("...")));
    }

    #[test]
    fn affected() {
        let mut total = RowsAffected::default();
        total.extend([
            RowsAffected {
                rows_affected: 1,
                last_affected_id: Some(3),
            },
            RowsAffected {
                rows_affected: 2,
                last_affected_id: None,
            },
        ]);
        assert_eq!(total.rows_affected, 3);
        assert_eq!(total.last_affected_id, Some(3));
    }

    #[test]
    fn row_column() {
        let row = RowLabeled::new(
            ["id".to_string(), "Name".to_string()].into(),
            [Value::Int64(Some(1)), "Ada".into()].into(),
        );
        assert_eq!(row.get_column("name"), Some(&Value::Varchar(Some("Ada".into()))));
        assert!(row.get_column("age").is_none());
    }
}
