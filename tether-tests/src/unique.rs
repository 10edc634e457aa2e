use crate::{people::Person, silent_logs};
use tether::{Connection, Model};

async fn count<C: Connection>(connection: &mut C) -> usize {
    Person::default()
        .filter([])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to count people")
        .len()
}

pub async fn unique<C: Connection>(connection: &mut C) {
    let before = count(connection).await;
    let result;
    silent_logs! {
        result = Person::new("Alice Again", "alice@example.com", 50)
            .save(connection)
            .await;
    }
    let error = result.expect_err("Duplicate email must be rejected");
    assert!(
        format!("{:#}", error).contains("UNIQUE"),
        "Unexpected error: {:#}",
        error
    );
    assert_eq!(count(connection).await, before);

    // The connection is still usable after the rollback
    Person::new("Erin", "erin@example.com", 29)
        .save(connection)
        .await
        .expect("Failed to save after a rollback");
    assert_eq!(count(connection).await, before + 1);
}
