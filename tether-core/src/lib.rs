mod as_value;
mod column;
mod condition;
mod config;
mod connection;
mod driver;
mod error;
mod executor;
mod field;
mod model;
mod query;
mod reflect;
pub mod registry;
mod schema;
mod sql_writer;
mod statement;
mod transaction;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use condition::*;
pub use config::*;
pub use connection::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use field::*;
pub use model::*;
pub use query::*;
pub use reflect::*;
pub use registry::Table;
pub use schema::*;
pub use sql_writer::*;
pub use statement::*;
pub use transaction::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
