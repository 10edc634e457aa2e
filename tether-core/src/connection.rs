use crate::{Driver, Executor, Result};
use std::future::Future;

pub trait Connection: Executor {
    /// Open a connection to the given URL, e.g. `sqlite://data.db`.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;

    /// Start a transaction, it rolls back unless committed.
    fn begin(
        &mut self,
    ) -> impl Future<Output = Result<<Self::Driver as Driver>::Transaction<'_>>> + Send;
}
