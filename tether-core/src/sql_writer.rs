use crate::{ColumnDef, Combinator, Operator, Predicate, Value, separated_by};
use std::fmt::Write;

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Words that cannot be used as a bare identifier.
pub const RESERVED_WORDS: &[&str] = &[
    "ABORT", "ACTION", "ADD", "AFTER", "ALL", "ALTER", "ALWAYS", "ANALYZE", "AND", "AS", "ASC",
    "ATTACH", "AUTOINCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE", "CASE", "CAST",
    "CHECK", "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE", "CROSS",
    "CURRENT", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "DATABASE", "DEFAULT",
    "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DETACH", "DISTINCT", "DO", "DROP", "EACH",
    "ELSE", "END", "ESCAPE", "EXCEPT", "EXCLUDE", "EXCLUSIVE", "EXISTS", "EXPLAIN", "FAIL",
    "FILTER", "FIRST", "FOLLOWING", "FOR", "FOREIGN", "FROM", "FULL", "GENERATED", "GLOB",
    "GROUP", "GROUPS", "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN", "INDEX", "INDEXED",
    "INITIALLY", "INNER", "INSERT", "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN",
    "KEY", "LAST", "LEFT", "LIKE", "LIMIT", "MATCH", "MATERIALIZED", "NATURAL", "NO", "NOT",
    "NOTHING", "NOTNULL", "NULL", "NULLS", "OF", "OFFSET", "ON", "OR", "ORDER", "OTHERS",
    "OUTER", "OVER", "PARTITION", "PLAN", "PRAGMA", "PRECEDING", "PRIMARY", "QUERY", "RAISE",
    "RANGE", "RECURSIVE", "REFERENCES", "REGEXP", "REINDEX", "RELEASE", "RENAME", "REPLACE",
    "RESTRICT", "RETURNING", "RIGHT", "ROLLBACK", "ROW", "ROWS", "SAVEPOINT", "SELECT", "SET",
    "TABLE", "TEMP", "TEMPORARY", "THEN", "TIES", "TO", "TRANSACTION", "TRIGGER", "UNBOUNDED",
    "UNION", "UNIQUE", "UPDATE", "USING", "VACUUM", "VALUES", "VIEW", "VIRTUAL", "WHEN",
    "WHERE", "WINDOW", "WITH", "WITHOUT",
];

/// Dialect printer turning schemas, predicates and values into SQL text.
///
/// Every method has a default rendering, drivers override the pieces their
/// store spells differently.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Copies `value` into `out` replacing every `search` with `replace`.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Table or column name, double quoted when it is a reserved word or not
    /// made of lowercase letters, digits and underscores.
    fn write_identifier(&self, out: &mut String, name: &str) {
        let plain = name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && !name.is_empty()
            && !RESERVED_WORDS.iter().any(|v| v.eq_ignore_ascii_case(name));
        if plain {
            out.push_str(name);
        } else {
            out.push('"');
            self.write_escaped(out, name, '"', "\"\"");
            out.push('"');
        }
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(out),
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int64(Some(v)) => self.write_value_integer(out, *v),
            Value::Float64(Some(v)) => self.write_value_float(out, *v),
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v),
            _ => self.write_value_none(out),
        }
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(if value { "TRUE" } else { "FALSE" });
    }

    fn write_value_integer(&self, out: &mut String, value: i64) {
        write_integer!(out, value);
    }

    fn write_value_float(&self, out: &mut String, value: f64) {
        if value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            out.push_str(buffer.format_finite(value));
        } else {
            self.write_value_none(out);
        }
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    /// `'<name>' <type>[ NOT NULL][ UNIQUE][ DEFAULT '<v>']`
    fn write_column_def(&self, out: &mut String, column: &ColumnDef) {
        self.write_value_string(out, &column.name);
        out.push(' ');
        out.push_str(&column.column_type);
        if !column.nullable {
            out.push_str(" NOT NULL");
        }
        if column.unique {
            out.push_str(" UNIQUE");
        }
        if let Some(default) = &column.default {
            out.push_str(" DEFAULT ");
            self.write_value_string(out, default);
        }
    }

    fn write_create_table(&self, out: &mut String, table: &str, columns: &[ColumnDef]) {
        out.reserve(64 + columns.len() * 32);
        out.push_str("CREATE TABLE IF NOT EXISTS ");
        self.write_identifier(out, table);
        out.push_str(" (id INTEGER PRIMARY KEY");
        for column in columns {
            out.push_str(", ");
            self.write_column_def(out, column);
        }
        out.push_str(");");
    }

    /// `[NOT] <column> <op> <operand>`, the leading space is kept when not negated.
    /// Equality with NULL is written `IS NULL` / `IS NOT NULL`.
    fn write_predicate(&self, out: &mut String, predicate: &Predicate) {
        if predicate.negated {
            out.push_str("NOT");
        }
        out.push(' ');
        self.write_identifier(out, &predicate.column);
        out.push(' ');
        match (predicate.operator, predicate.operands.as_slice()) {
            (Operator::Eq, [v]) if v.is_null() => return out.push_str("IS NULL"),
            (Operator::Ne, [v]) if v.is_null() => return out.push_str("IS NOT NULL"),
            _ => {}
        }
        out.push_str(predicate.operator.as_str());
        out.push(' ');
        match predicate.operator {
            Operator::Between => separated_by(
                out,
                &predicate.operands,
                |out, v| self.write_value(out, v),
                " AND ",
            ),
            Operator::In => {
                out.push('(');
                separated_by(
                    out,
                    &predicate.operands,
                    |out, v| self.write_value(out, v),
                    ", ",
                );
                out.push(')');
            }
            _ => match predicate.operands.first() {
                Some(v) => self.write_value(out, v),
                None => self.write_value_none(out),
            },
        }
    }

    fn write_select(
        &self,
        out: &mut String,
        table: &str,
        predicates: &[Predicate],
        combinator: Combinator,
    ) {
        out.push_str("SELECT * FROM ");
        self.write_identifier(out, table);
        if predicates.is_empty() {
            return;
        }
        out.push_str(" WHERE (");
        separated_by(
            out,
            predicates,
            |out, v| self.write_predicate(out, v),
            combinator.separator(),
        );
        out.push(')');
    }

    fn write_select_by_id(&self, out: &mut String, table: &str) {
        out.push_str("SELECT * FROM ");
        self.write_identifier(out, table);
        out.push_str(" WHERE id = ?");
    }

    /// Insert with one `:name` placeholder per column.
    fn write_insert(&self, out: &mut String, table: &str, columns: &[ColumnDef]) {
        out.push_str("INSERT INTO ");
        self.write_identifier(out, table);
        if columns.is_empty() {
            out.push_str(" DEFAULT VALUES");
            return;
        }
        out.push_str(" (");
        separated_by(out, columns, |out, v| self.write_identifier(out, &v.name), ", ");
        out.push_str(") VALUES (");
        separated_by(
            out,
            columns,
            |out, v| {
                out.push(':');
                out.push_str(&v.name);
            },
            ", ",
        );
        out.push(')');
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN;");
    }

    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT;");
    }

    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK;");
    }
}

/// Standard SQL rendering.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
