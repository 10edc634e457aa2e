#[cfg(test)]
mod tests {
    use tether_core::Connection;
    use tether_sqlite::SqliteConnection;
    use tether_tests::{execute_tests, init_logs};

    #[tokio::test]
    async fn sqlite() {
        init_logs();
        let connection = SqliteConnection::connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        execute_tests(connection).await;
    }
}
