use tether::{
    Connection, Model, Record, SchemaDefinition, char_field, define_schema, email_field, field,
    int_field, registry,
};

#[derive(Record, Default, Debug, Clone, PartialEq)]
pub(crate) struct Person {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) age: i64,
}

impl Person {
    pub(crate) fn new(name: &str, email: &str, age: i64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }
}

impl Model for Person {
    fn schema(&self) -> SchemaDefinition<Self> {
        define_schema(
            self,
            [
                char_field(&self.name, 50),
                email_field(&self.email).unique(),
                int_field(&self.age).default(18),
            ],
        )
    }
}

fn names(people: &[Person]) -> Vec<&str> {
    let mut names: Vec<_> = people.iter().map(|v| v.name.as_str()).collect();
    names.sort();
    names
}

pub async fn people<C: Connection>(connection: &mut C) {
    registry::register_models(connection, [Person::default().table()])
        .await
        .expect("Failed to register Person");

    // Save
    let mut ids = Vec::new();
    for person in [
        Person::new("Alice", "alice@example.com", 34),
        Person::new("Bob", "bob@example.com", 17),
        Person::new("Carol", "carol@example.com", 65),
        Person::new("Dave", "dave@example.com", 42),
    ] {
        let affected = person
            .save(connection)
            .await
            .expect("Failed to save a person");
        assert_eq!(affected.rows_affected, 1);
        ids.push(affected.last_affected_id.expect("Expected the id of the new row"));
    }

    // Get
    let carol = Person::get(connection, ids[2])
        .await
        .expect("Failed to get Carol");
    assert_eq!(carol, Person::new("Carol", "carol@example.com", 65));

    let probe = Person::default();

    // Filter
    let adults = probe
        .filter([field(&probe.age).gt(30)])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query adults");
    assert_eq!(names(&adults), ["Alice", "Carol", "Dave"]);

    let working_age = probe
        .filter([field(&probe.age).gt(18), field(&probe.age).lt(65)])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query working age");
    assert_eq!(names(&working_age), ["Alice", "Dave"]);

    let either = probe
        .or_filter([field(&probe.age).lt(18), field(&probe.age).ge(65)])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query with OR");
    assert_eq!(names(&either), ["Bob", "Carol"]);

    let same = probe
        .filter([field(&probe.age).lt(18), field(&probe.age).ge(65)])
        .expect("Person is registered")
        .or()
        .all(connection)
        .await
        .expect("Failed to query with OR");
    assert_eq!(names(&same), ["Bob", "Carol"]);

    let between = probe
        .filter([field(&probe.age).between(34, 42)])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query with BETWEEN");
    assert_eq!(names(&between), ["Alice", "Dave"]);

    let like = probe
        .filter([field(&probe.name).like("%a%")])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query with LIKE");
    assert_eq!(names(&like), ["Alice", "Carol", "Dave"]);

    let listed = probe
        .filter([field(&probe.email).is_in([
            "bob@example.com".to_string(),
            "dave@example.com".to_string(),
        ])])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query with IN");
    assert_eq!(names(&listed), ["Bob", "Dave"]);

    let not_bob = probe
        .filter([field(&probe.name).eq("Bob".into()).not()])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query with NOT");
    assert_eq!(names(&not_bob), ["Alice", "Carol", "Dave"]);

    let other = probe
        .filter([field(&probe.name).ne("Alice".into()), field(&probe.age).le(42)])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query with <>");
    assert_eq!(names(&other), ["Bob", "Dave"]);

    let everyone = probe
        .filter([])
        .expect("Person is registered")
        .all(connection)
        .await
        .expect("Failed to query everyone");
    assert_eq!(everyone.len(), 4);

    // Table name
    assert_eq!(Person::table_name(), "person");
}
