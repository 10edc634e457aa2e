use tether_core::SqlWriter;

/// Sqlite has no boolean storage class, booleans are written as integers.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter;

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(if value { '1' } else { '0' });
    }
}
