use crate::{
    Driver, Result, RowLabeled, RowsAffected, Statement,
    stream::{Stream, StreamExt},
};
use std::{future::Future, pin::pin};

/// Runs statements against a store. Implemented by connections and transactions.
pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Execute the statement and return the number of rows affected.
    ///
    /// A statement without bindings may hold several commands, they run in order.
    fn execute(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<RowsAffected>> + Send;

    /// Execute the statement and stream the rows it returns.
    fn fetch(&mut self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send;

    /// First row returned by the statement, if any.
    fn fetch_one(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<Option<RowLabeled>>> + Send {
        let stream = self.fetch(statement);
        async move { pin!(stream).next().await.transpose() }
    }
}
