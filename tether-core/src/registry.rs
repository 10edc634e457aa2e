use crate::{
    ColumnDef, Context, Driver, Executor, Record, Result, SchemaDefinition, SqlWriter, TableError,
};
use std::{
    any::{Any, TypeId, type_name},
    collections::BTreeMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

/// Type erased view of a [`SchemaDefinition`], what the registry stores.
pub trait Table: Send + Sync + 'static {
    fn table_name(&self) -> &str;
    /// Name of the record type bound to the table.
    fn record_name(&self) -> &'static str;
    fn record_type(&self) -> TypeId;
    fn columns(&self) -> &[ColumnDef];
    fn write_create_table(&self, writer: &dyn SqlWriter, out: &mut String);
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

static REGISTRY: LazyLock<RwLock<BTreeMap<String, Arc<dyn Table>>>> =
    LazyLock::new(Default::default);

/// Adds the tables to the process wide registry.
///
/// The batch is checked before anything is inserted: a table name already
/// taken by a different record type fails the whole call. Registering the same
/// record again replaces its schema.
pub fn register<I>(tables: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Into<Arc<dyn Table>>,
{
    let tables: Vec<Arc<dyn Table>> = tables.into_iter().map(Into::into).collect();
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    let mut batch = BTreeMap::<&str, &Arc<dyn Table>>::new();
    for table in &tables {
        let name = table.table_name();
        let existing = batch
            .get(name)
            .map(|v| (v.record_type(), v.record_name()))
            .or_else(|| {
                registry
                    .get(name)
                    .map(|v| (v.record_type(), v.record_name()))
            });
        if let Some((record_type, record_name)) = existing {
            if record_type != table.record_type() {
                let error = TableError::Duplicate {
                    table: name.to_string(),
                    existing: record_name,
                };
                log::error!("{:#}", error);
                return Err(error.into());
            }
        }
        batch.insert(name, table);
    }
    for table in tables {
        log::debug!(
            "Registering table `{}` for `{}`",
            table.table_name(),
            table.record_name()
        );
        registry.insert(table.table_name().to_string(), table);
    }
    Ok(())
}

/// Creates every registered table that does not exist yet.
///
/// All the statements are sent together as a single batch.
pub async fn migrate<E: Executor>(executor: &mut E) -> Result<()> {
    let sql = {
        let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
        if registry.is_empty() {
            return Ok(());
        }
        let writer = executor.driver().sql_writer();
        let mut sql = String::new();
        for table in registry.values() {
            table.write_create_table(writer.as_dyn(), &mut sql);
            sql.push('\n');
        }
        sql
    };
    log::debug!("Migrating:\n{}", crate::truncate_long!(sql));
    executor
        .execute(sql.into())
        .await
        .context("Failed to execute migration")?;
    Ok(())
}

/// [`register`] followed by [`migrate`].
pub async fn register_models<E, I>(executor: &mut E, tables: I) -> Result<()>
where
    E: Executor,
    I: IntoIterator,
    I::Item: Into<Arc<dyn Table>>,
{
    register(tables)?;
    migrate(executor).await
}

/// [`register_models`] for startup code: any failure is fatal.
pub async fn must_register<E, I>(executor: &mut E, tables: I)
where
    E: Executor,
    I: IntoIterator,
    I::Item: Into<Arc<dyn Table>>,
{
    if let Err(e) = register_models(executor, tables).await {
        log::error!("{:#}", e);
        panic!("Could not register the models: {:#}", e);
    }
}

/// Schema registered for the record type `R`.
pub fn lookup<R: Record>() -> std::result::Result<Arc<SchemaDefinition<R>>, TableError> {
    let table = R::table_name();
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    let Some(entry) = registry.get(&table) else {
        return Err(TableError::NotRegistered {
            type_name: type_name::<R>(),
        });
    };
    entry
        .clone()
        .into_any()
        .downcast::<SchemaDefinition<R>>()
        .map_err(|_| TableError::WrongType {
            table,
            type_name: type_name::<R>(),
        })
}

/// Name of every registered table, sorted.
pub fn registered_tables() -> Vec<String> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}
