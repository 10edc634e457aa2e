use crate::{
    Combinator, Condition, Connection, Context, Driver, Error, Executor, FieldError, FieldMap,
    Query, Reflect, Result, RowLabeled, RowsAffected, SchemaDefinition, SqlWriter, Statement,
    Table, TableError, Transaction, registry, sql_name, truncate_long,
};
use std::future::Future;

/// A struct stored as one row of a table.
///
/// Usually derived with `#[derive(Record)]`.
pub trait Record: Reflect + Default + Send + Sync + Sized + 'static {
    /// Name of the type, the table is named after it.
    const NAME: &'static str;

    /// Decodes a row, columns without a matching field are ignored.
    fn from_row(row: RowLabeled) -> Result<Self>;

    fn table_name() -> String {
        sql_name(Self::NAME)
    }
}

/// Persistence operations of a [`Record`] bound to a table.
///
/// # Examples
/// ```ignore
/// impl Model for Person {
///     fn schema(&self) -> SchemaDefinition<Self> {
///         define_schema(self, [
///             char_field(&self.name, 50),
///             email_field(&self.email).unique(),
///             int_field(&self.age).default(18),
///         ])
///     }
/// }
///
/// let person = Person::default();
/// let adults = person
///     .filter([field(&person.age).ge(18)])?
///     .all(&mut connection)
///     .await?;
/// ```
pub trait Model: Record {
    /// Columns of the table, declared on the fields of `self`.
    fn schema(&self) -> SchemaDefinition<Self>;

    /// The schema ready to be registered.
    fn table(&self) -> Box<dyn Table> {
        Box::new(self.schema())
    }

    /// Query matching all the conditions.
    ///
    /// The conditions must point to fields of `self`. Fails only when the
    /// table is not registered, condition errors are reported by the query.
    fn filter<'c>(
        &self,
        conditions: impl IntoIterator<Item = Condition<'c>>,
    ) -> Result<Query<Self>> {
        let schema = registry::lookup::<Self>()?;
        Ok(Query::new(schema, self, conditions, Combinator::And))
    }

    /// Query matching any of the conditions.
    fn or_filter<'c>(
        &self,
        conditions: impl IntoIterator<Item = Condition<'c>>,
    ) -> Result<Query<Self>> {
        let schema = registry::lookup::<Self>()?;
        Ok(Query::new(schema, self, conditions, Combinator::Or))
    }

    /// The row with the given id.
    fn get<E: Executor>(executor: &mut E, id: i64) -> impl Future<Output = Result<Self>> + Send {
        async move {
            let schema = registry::lookup::<Self>()?;
            let mut sql = String::new();
            executor
                .driver()
                .sql_writer()
                .write_select_by_id(&mut sql, schema.table_name());
            log::debug!("{} [{}]", sql, id);
            let Some(row) = executor.fetch_one(Statement::new(sql).bind(id)).await? else {
                return Err(TableError::NotFound {
                    table: schema.table_name().to_string(),
                    id,
                }
                .into());
            };
            Self::from_row(row)
        }
    }

    /// Inserts `self` as a new row inside its own transaction.
    ///
    /// The transaction is rolled back when any step fails.
    fn save<C: Connection>(
        &self,
        connection: &mut C,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let statement = insert_statement(self, connection.driver().sql_writer().as_dyn());
        async move {
            let statement = statement?;
            log::debug!("{}", statement);
            let mut transaction = connection.begin().await?;
            match transaction.execute(statement).await {
                Ok(affected) => {
                    transaction
                        .commit()
                        .await
                        .with_context(|| format!("Failed to commit `{}`", Self::NAME))?;
                    Ok(affected)
                }
                Err(e) => {
                    if let Err(e) = transaction.rollback().await {
                        log::error!("{:#}", e.context("While rolling back the failed save"));
                    }
                    Err(e.context(format!("Failed to save `{}`", Self::NAME)))
                }
            }
        }
    }
}

/// Insert of every column of `record`, values bound by column name.
fn insert_statement<R: Record>(record: &R, writer: &dyn SqlWriter) -> Result<Statement> {
    let schema = registry::lookup::<R>()?;
    let map = FieldMap::build(record)?;
    let mut sql = String::new();
    writer.write_insert(&mut sql, schema.table_name(), schema.columns());
    let mut statement = Statement::new(sql);
    for column in schema.columns() {
        let Some(slot) = map.by_column(&column.name) else {
            let error = FieldError::MissingValue {
                record: R::NAME,
                name: column.name.clone(),
            };
            log::error!("{}", error);
            return Err(Error::new(error).context(format!(
                "While preparing:\n{}",
                truncate_long!(statement.sql)
            )));
        };
        statement = statement.bind_named(column.name.as_str(), slot.value());
    }
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use crate::{
        AsValue, Connection, Driver, Executor, FieldError, FieldSlot, GenericSqlWriter, Model,
        Record, Reflect, Result, RowLabeled, RowsAffected, SchemaDefinition, Shape, Statement,
        TableError, Transaction, Value, char_field, define_schema, field, float_field, future,
        int_field, registry,
        stream::{self, Stream},
    };
    use std::{collections::VecDeque, future::Future, iter::zip, sync::Arc};

    #[derive(Default, Debug, PartialEq)]
    struct Gadget {
        name: String,
        weight: i64,
        price: f64,
    }

    impl Reflect for Gadget {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(vec![
                FieldSlot::new("name", &self.name),
                FieldSlot::new("weight", &self.weight),
                FieldSlot::new("price", &self.price),
            ])
        }
    }

    impl Record for Gadget {
        const NAME: &'static str = "Gadget";
        fn from_row(row: RowLabeled) -> Result<Self> {
            let mut result = Self::default();
            for (label, value) in zip(row.labels.iter(), row.values.into_vec()) {
                match label.to_lowercase().as_str() {
                    "name" => result.name = AsValue::try_from_value(value)?,
                    "weight" => result.weight = AsValue::try_from_value(value)?,
                    "price" => result.price = AsValue::try_from_value(value)?,
                    _ => {}
                }
            }
            Ok(result)
        }
    }

    impl Model for Gadget {
        fn schema(&self) -> SchemaDefinition<Self> {
            define_schema(
                self,
                [
                    char_field(&self.name, 20).unique(),
                    int_field(&self.weight),
                    float_field(&self.price).default(0.5),
                ],
            )
        }
    }

    #[derive(Default)]
    struct Imposter {
        code: String,
    }

    impl Reflect for Imposter {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(vec![FieldSlot::new("code", &self.code)])
        }
    }

    impl Record for Imposter {
        const NAME: &'static str = "GADGET";
        fn from_row(_row: RowLabeled) -> Result<Self> {
            Ok(Self::default())
        }
    }

    impl Model for Imposter {
        fn schema(&self) -> SchemaDefinition<Self> {
            define_schema(self, [char_field(&self.code, 4)])
        }
    }

    #[derive(Default, Debug)]
    struct Unregistered {
        id: i64,
    }

    impl Reflect for Unregistered {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(vec![FieldSlot::new("id", &self.id)])
        }
    }

    impl Record for Unregistered {
        const NAME: &'static str = "Unregistered";
        fn from_row(_row: RowLabeled) -> Result<Self> {
            Ok(Self::default())
        }
    }

    impl Model for Unregistered {
        fn schema(&self) -> SchemaDefinition<Self> {
            define_schema(self, [int_field(&self.id)])
        }
    }

    struct MockDriver;

    impl Driver for MockDriver {
        type Connection = MockConnection;
        type SqlWriter = GenericSqlWriter;
        type Transaction<'c> = MockTransaction<'c>;

        const NAME: &'static str = "mock";

        fn sql_writer(&self) -> GenericSqlWriter {
            GenericSqlWriter
        }
    }

    /// Records every statement and answers with the queued rows.
    #[derive(Default)]
    struct MockConnection {
        log: Vec<Statement>,
        rows: VecDeque<Vec<RowLabeled>>,
        fail_bound: bool,
    }

    impl MockConnection {
        fn sql_log(&self) -> Vec<&str> {
            self.log.iter().map(|v| v.sql.as_str()).collect()
        }
    }

    impl Executor for MockConnection {
        type Driver = MockDriver;

        fn driver(&self) -> &MockDriver {
            &MockDriver
        }

        fn execute(
            &mut self,
            statement: Statement,
        ) -> impl Future<Output = Result<RowsAffected>> + Send {
            let fail = self.fail_bound && statement.has_bindings();
            self.log.push(statement);
            future::ready(if fail {
                Err(crate::Error::msg("UNIQUE constraint failed"))
            } else {
                Ok(RowsAffected {
                    rows_affected: 1,
                    last_affected_id: Some(7),
                })
            })
        }

        fn fetch(&mut self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send {
            self.log.push(statement);
            let rows = self.rows.pop_front().unwrap_or_default();
            stream::iter(rows.into_iter().map(Ok))
        }
    }

    impl Connection for MockConnection {
        fn connect(_url: &str) -> impl Future<Output = Result<Self>> + Send {
            future::ready(Ok(Self::default()))
        }

        fn begin(&mut self) -> impl Future<Output = Result<MockTransaction<'_>>> + Send {
            self.log.push("BEGIN;".into());
            future::ready(Ok(MockTransaction { connection: self }))
        }
    }

    struct MockTransaction<'c> {
        connection: &'c mut MockConnection,
    }

    impl Executor for MockTransaction<'_> {
        type Driver = MockDriver;

        fn driver(&self) -> &MockDriver {
            &MockDriver
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

    impl<'c> Transaction<'c> for MockTransaction<'c> {
        fn commit(self) -> impl Future<Output = Result<()>> + Send {
            self.connection.log.push("COMMIT;".into());
            future::ready(Ok(()))
        }

        fn rollback(self) -> impl Future<Output = Result<()>> + Send {
            self.connection.log.push("ROLLBACK;".into());
            future::ready(Ok(()))
        }
    }

    fn gadget_row(name: &str, weight: i64, price: f64) -> RowLabeled {
        RowLabeled::new(
            Arc::from(["id".to_string(), "name".into(), "weight".into(), "price".into()]),
            [
                Value::from(1_i64),
                Value::from(name),
                Value::from(weight),
                Value::from(price),
            ]
            .into(),
        )
    }

    fn register_gadget() {
        registry::register([Gadget::default().table()]).expect("Gadget registers");
    }

    #[test]
    fn filter_sql() {
        register_gadget();
        let g = Gadget::default();
        let writer = GenericSqlWriter;
        let query = g
            .filter([field(&g.weight).gt(3), field(&g.name).like("a%")])
            .unwrap();
        assert_eq!(
            query.sql(&writer).unwrap(),
            "SELECT * FROM gadget WHERE ( weight > 3 AND  name LIKE 'a%')"
        );
        assert_eq!(
            query.or().sql(&writer).unwrap(),
            "SELECT * FROM gadget WHERE ( weight > 3 OR  name LIKE 'a%')"
        );
        let query = g
            .or_filter([field(&g.price).le(1.5), field(&g.weight).between(1, 2).not()])
            .unwrap();
        assert_eq!(
            query.sql(&writer).unwrap(),
            "SELECT * FROM gadget WHERE ( price <= 1.5 OR NOT weight BETWEEN 1 AND 2)"
        );
        assert_eq!(
            g.filter([]).unwrap().sql(&writer).unwrap(),
            "SELECT * FROM gadget"
        );
    }

    #[test]
    fn unregistered() {
        let u = Unregistered::default();
        let error = u.filter([field(&u.id).eq(1)]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<TableError>(),
            Some(TableError::NotRegistered { .. })
        ));
    }

    #[test]
    fn duplicate_table() {
        register_gadget();
        let error = registry::register([Imposter::default().table()]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<TableError>(),
            Some(TableError::Duplicate { existing: "Gadget", .. })
        ));
        assert!(registry::lookup::<Gadget>().is_ok());
        assert!(matches!(
            registry::lookup::<Imposter>(),
            Err(TableError::WrongType { .. })
        ));
    }

    #[tokio::test]
    async fn lazy_condition_error() {
        register_gadget();
        let mut connection = MockConnection::default();
        let a = Gadget::default();
        let b = Gadget::default();
        let query = b.filter([field(&a.weight).gt(1)]).unwrap();
        assert!(matches!(query.error(), Some(FieldError::CantGetName { .. })));
        let error = query.all(&mut connection).await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<FieldError>(),
            Some(FieldError::CantGetName { .. })
        ));
        assert!(connection.log.is_empty());
    }

    #[tokio::test]
    async fn all_rows() {
        register_gadget();
        let mut connection = MockConnection::default();
        connection
            .rows
            .push_back(vec![gadget_row("bolt", 2, 0.1), gadget_row("nut", 1, 0.05)]);
        let g = Gadget::default();
        let gadgets = g
            .filter([field(&g.weight).ge(1)])
            .unwrap()
            .all(&mut connection)
            .await
            .unwrap();
        assert_eq!(
            gadgets,
            [
                Gadget {
                    name: "bolt".into(),
                    weight: 2,
                    price: 0.1
                },
                Gadget {
                    name: "nut".into(),
                    weight: 1,
                    price: 0.05
                },
            ]
        );
        assert_eq!(
            connection.sql_log(),
            ["SELECT * FROM gadget WHERE ( weight >= 1)"]
        );
    }

    #[tokio::test]
    async fn get() {
        register_gadget();
        let mut connection = MockConnection::default();
        connection.rows.push_back(vec![gadget_row("gear", 5, 3.0)]);
        let gadget = Gadget::get(&mut connection, 1).await.unwrap();
        assert_eq!(gadget.name, "gear");
        assert_eq!(
            connection.log,
            [Statement::new("SELECT * FROM gadget WHERE id = ?").bind(1_i64)]
        );

        let error = Gadget::get(&mut connection, 42).await.unwrap_err();
        assert_eq!(
            error.downcast_ref::<TableError>(),
            Some(&TableError::NotFound {
                table: "gadget".into(),
                id: 42
            })
        );
    }

    #[tokio::test]
    async fn save() {
        register_gadget();
        let mut connection = MockConnection::default();
        let gadget = Gadget {
            name: "spring".into(),
            weight: 3,
            price: 1.25,
        };
        let affected = gadget.save(&mut connection).await.unwrap();
        assert_eq!(affected.last_affected_id, Some(7));
        assert_eq!(
            connection.log,
            [
                Statement::new("BEGIN;"),
                Statement::new("INSERT INTO gadget (name, weight, price) VALUES (:name, :weight, :price)")
                    .bind_named("name", "spring")
                    .bind_named("weight", 3_i64)
                    .bind_named("price", 1.25_f64),
                Statement::new("COMMIT;"),
            ]
        );
    }

    #[tokio::test]
    async fn save_rollback() {
        register_gadget();
        let mut connection = MockConnection {
            fail_bound: true,
            ..Default::default()
        };
        let error = Gadget::default().save(&mut connection).await.unwrap_err();
        assert_eq!(error.to_string(), "Failed to save `Gadget`");
        assert_eq!(
            connection.sql_log(),
            [
                "BEGIN;",
                "INSERT INTO gadget (name, weight, price) VALUES (:name, :weight, :price)",
                "ROLLBACK;"
            ]
        );
    }

    #[tokio::test]
    async fn migrate() {
        register_gadget();
        let mut connection = MockConnection::default();
        registry::migrate(&mut connection).await.unwrap();
        let [statement] = connection.log.as_slice() else {
            panic!("Expected a single migration batch");
        };
        assert!(!statement.has_bindings());
        assert!(statement.sql.contains(
            "CREATE TABLE IF NOT EXISTS gadget (id INTEGER PRIMARY KEY, 'name' VARCHAR(20) NOT NULL UNIQUE, 'weight' INT NOT NULL, 'price' REAL NOT NULL DEFAULT '0.5');"
        ));
        assert!(registry::registered_tables().contains(&"gadget".to_string()));
    }
}
