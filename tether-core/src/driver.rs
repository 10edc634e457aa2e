use crate::{Connection, SqlWriter, Transaction};

/// Entry point of a store implementation.
pub trait Driver: Send + Sync + 'static {
    type Connection: Connection<Driver = Self>;
    type SqlWriter: SqlWriter;
    type Transaction<'c>: Transaction<'c, Driver = Self>;

    /// Name used in connection URLs and in the `DATABASE` setting.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
