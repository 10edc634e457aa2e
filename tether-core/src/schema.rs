use crate::{ColumnDef, FieldDescriptor, FieldError, FieldMap, Record, SqlWriter, Table};
use std::{
    any::{Any, TypeId},
    collections::HashSet,
    fmt::{self, Debug},
    marker::PhantomData,
    sync::Arc,
};

/// Table bound to the record type `R`, with every column named.
pub struct SchemaDefinition<R> {
    table: String,
    columns: Vec<ColumnDef>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SchemaDefinition<R> {
    /// Resolves every descriptor against the fields of `instance`.
    ///
    /// Fails as a whole: no schema exists if a single descriptor does not
    /// point to a field of `instance` or two of them name the same column.
    pub fn try_new(
        instance: &R,
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, FieldError> {
        let map = FieldMap::build(instance)?;
        let mut names = HashSet::new();
        let columns = descriptors
            .into_iter()
            .map(|descriptor| {
                let column = descriptor.resolve(&map)?;
                if !names.insert(column.name.clone()) {
                    return Err(FieldError::DuplicateColumn {
                        record: R::NAME,
                        name: column.name,
                    });
                }
                Ok(column)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            table: R::table_name(),
            columns,
            _record: PhantomData,
        })
    }
}

impl<R> SchemaDefinition<R> {
    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }
}

impl<R> Clone for SchemaDefinition<R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            columns: self.columns.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> Debug for SchemaDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("table", &self.table)
            .field("columns", &self.columns)
            .finish()
    }
}

/// Same as [`SchemaDefinition::try_new`] but a definition error stops the
/// process. Schemas are declared once at startup, a broken one is a bug.
pub fn define_schema<R: Record>(
    instance: &R,
    descriptors: impl IntoIterator<Item = FieldDescriptor>,
) -> SchemaDefinition<R> {
    match SchemaDefinition::try_new(instance, descriptors) {
        Ok(schema) => schema,
        Err(e) => {
            log::error!("Invalid schema for `{}`: {}", R::NAME, e);
            panic!("Invalid schema for `{}`: {}", R::NAME, e);
        }
    }
}

impl<R: Record> Table for SchemaDefinition<R> {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn record_name(&self) -> &'static str {
        R::NAME
    }

    fn record_type(&self) -> TypeId {
        TypeId::of::<R>()
    }

    fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn write_create_table(&self, writer: &dyn SqlWriter, out: &mut String) {
        writer.write_create_table(out, &self.table, &self.columns);
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
