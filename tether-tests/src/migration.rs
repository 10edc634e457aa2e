use tether::{Connection, Executor, RowLabeled, Statement, Value, registry, stream::TryStreamExt};

async fn table_info<C: Connection>(connection: &mut C, table: &str) -> Vec<RowLabeled> {
    connection
        .fetch(Statement::new(format!("PRAGMA table_info({table})")))
        .try_collect()
        .await
        .expect("Failed to read the table info")
}

fn text(row: &RowLabeled, column: &str) -> String {
    match row.get_column(column) {
        Some(Value::Varchar(Some(v))) => v.clone(),
        other => panic!("Unexpected `{column}`: {other:?}"),
    }
}

pub async fn migration<C: Connection>(connection: &mut C) {
    let tables = registry::registered_tables();
    assert!(tables.contains(&"person".to_string()));
    assert!(tables.contains(&"book".to_string()));
    assert!(tables.contains(&"order".to_string()));

    // Tables are created only when missing
    registry::migrate(connection)
        .await
        .expect("First migration failed");
    registry::migrate(connection)
        .await
        .expect("Repeated migration failed");

    // The created table has exactly the declared columns
    let columns = table_info(connection, "person").await;
    let names: Vec<_> = columns.iter().map(|v| text(v, "name")).collect();
    assert_eq!(names, ["id", "name", "email", "age"]);
    let types: Vec<_> = columns.iter().map(|v| text(v, "type")).collect();
    assert_eq!(types, ["INTEGER", "VARCHAR(50)", "VARCHAR(255)", "INT"]);
    assert_eq!(
        columns[3].get_column("dflt_value"),
        Some(&Value::Varchar(Some("'18'".into())))
    );

    let columns = table_info(connection, "book").await;
    let names: Vec<_> = columns.iter().map(|v| text(v, "name")).collect();
    assert_eq!(names, ["id", "title", "pages", "rating", "available", "isbn"]);
}
