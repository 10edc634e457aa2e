use crate::{SqliteConnection, SqliteDriver};
use std::future::Future;
use tether_core::{
    Driver, Executor, Result, RowLabeled, RowsAffected, SqlWriter, Statement, Transaction,
    future, stream::Stream,
};

/// Transaction on a sqlite connection.
///
/// Rolled back on drop when neither committed nor rolled back.
pub struct SqliteTransaction<'c> {
    connection: &'c mut SqliteConnection,
    finished: bool,
}

impl<'c> SqliteTransaction<'c> {
    pub(crate) fn new(connection: &'c mut SqliteConnection) -> Result<Self> {
        let mut sql = String::new();
        connection
            .driver()
            .sql_writer()
            .write_transaction_begin(&mut sql);
        connection.execute_batch(&sql)?;
        Ok(Self {
            connection,
            finished: false,
        })
    }

    fn finish(&mut self, sql: &str) -> Result<()> {
        self.connection.execute_batch(sql)?;
        self.finished = true;
        Ok(())
    }
}

impl Executor for SqliteTransaction<'_> {
    type Driver = SqliteDriver;

    fn driver(&self) -> &SqliteDriver {
        self.connection.driver()
    }

    fn execute(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.connection.execute(statement)
    }

    fn fetch(&mut self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.connection.fetch(statement)
    }
}

impl<'c> Transaction<'c> for SqliteTransaction<'c> {
    fn commit(mut self) -> impl Future<Output = Result<()>> + Send {
        let mut sql = String::new();
        self.driver()
            .sql_writer()
            .write_transaction_commit(&mut sql);
        future::ready(self.finish(&sql))
    }

    fn rollback(mut self) -> impl Future<Output = Result<()>> + Send {
        let mut sql = String::new();
        self.driver()
            .sql_writer()
            .write_transaction_rollback(&mut sql);
        future::ready(self.finish(&sql))
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::warn!("Rolling back a transaction that was neither committed nor rolled back");
        let mut sql = String::new();
        self.connection
            .driver()
            .sql_writer()
            .write_transaction_rollback(&mut sql);
        if let Err(e) = self.connection.execute_batch(&sql) {
            log::error!("{:#}", e.context("While rolling back on drop"));
        }
    }
}
