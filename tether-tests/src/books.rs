use tether::{
    Connection, Executor, Model, Record, SchemaDefinition, Statement, bool_field, char_field,
    define_schema, field, float_field, int_field, registry, text_field,
};

#[derive(Record, Default, Debug, Clone, PartialEq)]
struct Book {
    title: String,
    pages: i32,
    rating: f64,
    available: bool,
    isbn: Option<String>,
    #[tether(ignore)]
    summary: String,
}

impl Model for Book {
    fn schema(&self) -> SchemaDefinition<Self> {
        define_schema(
            self,
            [
                char_field(&self.title, 120).unique(),
                int_field(&self.pages),
                float_field(&self.rating).default(0.0),
                bool_field(&self.available).default(true),
                text_field(&self.isbn).nullable(),
            ],
        )
    }
}

pub async fn books<C: Connection>(connection: &mut C) {
    registry::register_models(connection, [Book::default().table()])
        .await
        .expect("Failed to register Book");

    let dune = Book {
        title: "Dune".into(),
        pages: 412,
        rating: 4.6,
        available: true,
        isbn: Some("978-0441013593".into()),
        summary: "Not stored".into(),
    };
    let id = dune
        .save(connection)
        .await
        .expect("Failed to save Dune")
        .last_affected_id
        .expect("Expected the id of Dune");
    for book in [
        Book {
            title: "Neuromancer".into(),
            pages: 271,
            rating: 3.9,
            available: false,
            isbn: None,
            summary: String::new(),
        },
        Book {
            title: "Hyperion".into(),
            pages: 482,
            rating: 4.2,
            available: true,
            isbn: None,
            summary: String::new(),
        },
    ] {
        book.save(connection)
            .await
            .expect("Failed to save a book");
    }

    // The ignored field is not stored and comes back empty
    let stored = Book::get(connection, id).await.expect("Failed to get Dune");
    assert_eq!(
        stored,
        Book {
            summary: String::new(),
            ..dune.clone()
        }
    );

    let probe = Book::default();
    let mut available = probe
        .filter([field(&probe.available).eq(true)])
        .expect("Book is registered")
        .all(connection)
        .await
        .expect("Failed to query available books");
    available.sort_by(|a, b| a.title.cmp(&b.title));
    assert_eq!(available.len(), 2);
    assert_eq!(available[0].title, "Dune");
    assert_eq!(available[1].title, "Hyperion");
    assert_eq!(available[1].isbn, None);

    let good = probe
        .filter([field(&probe.rating).ge(4.2), field(&probe.pages).lt(450)])
        .expect("Book is registered")
        .all(connection)
        .await
        .expect("Failed to query good books");
    assert_eq!(good.len(), 1);
    assert_eq!(good[0].title, "Dune");

    let titled = probe
        .filter([field(&probe.title).is_in(["Neuromancer".into(), "Missing".into()])])
        .expect("Book is registered")
        .all(connection)
        .await
        .expect("Failed to query books by title");
    assert_eq!(titled.len(), 1);
    assert!(!titled[0].available);
    assert_eq!(titled[0].rating, 3.9);

    // Equality with NULL
    let mut missing = probe
        .filter([field(&probe.isbn).eq(None)])
        .expect("Book is registered")
        .all(connection)
        .await
        .expect("Failed to query books without isbn");
    missing.sort_by(|a, b| a.title.cmp(&b.title));
    let titles: Vec<_> = missing.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, ["Hyperion", "Neuromancer"]);

    let present = probe
        .filter([field(&probe.isbn).ne(None)])
        .expect("Book is registered")
        .all(connection)
        .await
        .expect("Failed to query books with isbn");
    assert_eq!(present.len(), 1);
    assert_eq!(present[0].isbn.as_deref(), Some("978-0441013593"));

    // Column default
    connection
        .execute(Statement::new(
            "INSERT INTO book (title, pages, rating) VALUES ('Solaris', 204, 4.0)",
        ))
        .await
        .expect("Failed to insert with defaults");
    let solaris = probe
        .filter([field(&probe.title).eq("Solaris".into())])
        .expect("Book is registered")
        .all(connection)
        .await
        .expect("Failed to query Solaris");
    assert_eq!(solaris.len(), 1);
    assert!(solaris[0].available);
}
