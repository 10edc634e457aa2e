use crate::{SqliteConnection, SqliteSqlWriter, SqliteTransaction};
use tether_core::Driver;

#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteDriver;

impl SqliteDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for SqliteDriver {
    type Connection = SqliteConnection;
    type SqlWriter = SqliteSqlWriter;
    type Transaction<'c> = SqliteTransaction<'c>;

    const NAME: &'static str = "sqlite";

    fn sql_writer(&self) -> SqliteSqlWriter {
        SqliteSqlWriter
    }
}
