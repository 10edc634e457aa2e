use tether::{
    Connection, Model, Record, SchemaDefinition, char_field, define_schema, field, int_field,
    registry,
};

/// Table and column named after SQL keywords.
#[derive(Record, Default, Debug, Clone, PartialEq)]
struct Order {
    group: String,
    total: i64,
}

impl Model for Order {
    fn schema(&self) -> SchemaDefinition<Self> {
        define_schema(self, [char_field(&self.group, 20), int_field(&self.total)])
    }
}

pub async fn orders<C: Connection>(connection: &mut C) {
    registry::register_models(connection, [Order::default().table()])
        .await
        .expect("Failed to register Order");
    let order = Order {
        group: "north".into(),
        total: 120,
    };
    let id = order
        .save(connection)
        .await
        .expect("Failed to save an order")
        .last_affected_id
        .expect("Expected the id of the order");
    Order {
        group: "south".into(),
        total: 80,
    }
    .save(connection)
    .await
    .expect("Failed to save an order");

    assert_eq!(
        Order::get(connection, id).await.expect("Failed to get the order"),
        order
    );
    let probe = Order::default();
    let north = probe
        .filter([field(&probe.group).eq("north".into())])
        .expect("Order is registered")
        .all(connection)
        .await
        .expect("Failed to query orders");
    assert_eq!(north, [order]);
}
