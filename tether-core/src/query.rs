use crate::{
    Combinator, Condition, Context, Driver, Executor, FieldError, FieldMap, Predicate, Record,
    Result, SchemaDefinition, SqlWriter, Statement,
    stream::{StreamExt, TryStreamExt},
    truncate_long,
};
use std::sync::Arc;

/// Select over the table of `R`, built by [`Model::filter`](crate::Model::filter).
///
/// Conditions are resolved when the query is built. The first one that fails
/// is kept and reported when the query is written or run.
#[derive(Debug)]
pub struct Query<R> {
    schema: Arc<SchemaDefinition<R>>,
    predicates: Vec<Predicate>,
    combinator: Combinator,
    error: Option<FieldError>,
}

impl<R: Record> Query<R> {
    /// Resolves `conditions` against the fields of `instance`.
    pub fn new<'c>(
        schema: Arc<SchemaDefinition<R>>,
        instance: &R,
        conditions: impl IntoIterator<Item = Condition<'c>>,
        combinator: Combinator,
    ) -> Self {
        let mut query = Self {
            schema,
            predicates: Vec::new(),
            combinator,
            error: None,
        };
        let map = match FieldMap::build(instance) {
            Ok(map) => map,
            Err(e) => {
                query.error = Some(e);
                return query;
            }
        };
        for condition in conditions {
            match condition.resolve(&map) {
                Ok(predicate) => query.predicates.push(predicate),
                Err(e) => {
                    log::debug!("Query on `{}` failed: {}", query.schema.table_name(), e);
                    query.error = Some(e);
                    break;
                }
            }
        }
        query
    }

    /// Join the predicates with `OR`.
    pub fn or(mut self) -> Self {
        self.combinator = Combinator::Or;
        self
    }

    /// Join the predicates with `AND`, the default.
    pub fn and(mut self) -> Self {
        self.combinator = Combinator::And;
        self
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    pub fn sql(&self, writer: &dyn SqlWriter) -> Result<String> {
        if let Some(error) = &self.error {
            return Err(error.clone().into());
        }
        let mut out = String::with_capacity(32 + self.predicates.len() * 24);
        writer.write_select(
            &mut out,
            self.schema.table_name(),
            &self.predicates,
            self.combinator,
        );
        Ok(out)
    }

    /// Runs the query and decodes every row.
    pub async fn all<E: Executor>(self, executor: &mut E) -> Result<Vec<R>> {
        let sql = self.sql(executor.driver().sql_writer().as_dyn())?;
        log::debug!("{}", truncate_long!(sql));
        let context = || {
            format!(
                "While fetching from `{}`:\n{}",
                self.schema.table_name(),
                truncate_long!(sql)
            )
        };
        executor
            .fetch(Statement::new(sql.as_str()))
            .map(|row| row.and_then(R::from_row))
            .try_collect::<Vec<_>>()
            .await
            .with_context(context)
    }
}
