use crate::people::Person;
use crate::silent_logs;
use tether::{Connection, FieldError, Model, TableError, column, field};

pub async fn resolution<C: Connection>(connection: &mut C) {
    let probe = Person::default();
    let stranger = Person::default();

    // A condition on another instance cannot be resolved, it fails when the query runs
    let query = probe
        .filter([field(&stranger.age).gt(30)])
        .expect("Person is registered");
    let result;
    silent_logs! {
        result = query.all(connection).await;
    }
    let error = result.expect_err("The query must fail");
    assert!(matches!(
        error.downcast_ref::<FieldError>(),
        Some(FieldError::CantGetName { .. })
    ));

    // Empty IN list
    let error = probe
        .filter([field(&probe.age).is_in([])])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect_err("An empty IN list must fail");
    assert_eq!(
        error.downcast_ref::<FieldError>(),
        Some(&FieldError::EmptyInList)
    );

    // Named column
    let named = probe
        .filter([column::<i64>("age").ge(65)])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query a named column");
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].name, "Carol");

    let error = probe
        .filter([column::<i64>("height").ge(1)])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect_err("Unknown column must fail");
    assert!(matches!(
        error.downcast_ref::<FieldError>(),
        Some(FieldError::CantGetName { .. })
    ));

    // Missing id
    let error = Person::get(connection, 999_999)
        .await
        .expect_err("Expected no person");
    assert_eq!(
        error.downcast_ref::<TableError>(),
        Some(&TableError::NotFound {
            table: "person".into(),
            id: 999_999,
        })
    );
}
