/// Failures raised while mapping fields to columns.
///
/// Definition time failures (returned by [`SchemaDefinition::try_new`](crate::SchemaDefinition::try_new))
/// are fatal through [`define_schema`](crate::define_schema). Resolution failures of a condition
/// are kept in the [`Query`](crate::Query) and surface when it runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("`{type_name}` is not a struct, its fields cannot be mapped")]
    NotAStruct { type_name: &'static str },
    #[error(
        "The field of type `{type_name}` at {address:#x} is not a field of the `{record}` instance being resolved"
    )]
    FieldNotInStruct {
        record: &'static str,
        type_name: &'static str,
        address: usize,
    },
    #[error("Column `{name}` is declared more than once for `{record}`")]
    DuplicateColumn { record: &'static str, name: String },
    #[error("Can't get the column name for a condition on `{target}` from the `{record}` instance")]
    CantGetName { record: &'static str, target: String },
    #[error("The IN list of a condition cannot be empty")]
    EmptyInList,
    #[error("Column `{name}` has no matching field in the `{record}` instance")]
    MissingValue { record: &'static str, name: String },
}

/// Failures raised by the schema registry and by lookups through it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("Table error 'Struct not registered' on user type '{type_name}'")]
    NotRegistered { type_name: &'static str },
    #[error("Table error 'Struct has wrong type' on user type '{type_name}' (table `{table}`)")]
    WrongType {
        table: String,
        type_name: &'static str,
    },
    #[error("Table `{table}` is already registered for the user type '{existing}'")]
    Duplicate {
        table: String,
        existing: &'static str,
    },
    #[error("No row in `{table}` with id {id}")]
    NotFound { table: String, id: i64 },
}

/// Failures raised while loading the connection settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable `{0}` is not set. Check if the .env file exists!")]
    Missing(&'static str),
    #[error("The configured driver is `{configured}` but a `{requested}` connection was requested")]
    DriverMismatch {
        configured: String,
        requested: &'static str,
    },
}
