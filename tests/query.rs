#[cfg(test)]
mod tests {
    use tether::{
        FieldError, GenericSqlWriter, Model, Record, SchemaDefinition, TableError, char_field,
        column, define_schema, field, float_field, int_field, registry,
    };

    #[derive(Record, Default, Debug, Clone)]
    struct Planet {
        name: String,
        moons: i32,
        mass: f64,
    }

    impl Model for Planet {
        fn schema(&self) -> SchemaDefinition<Self> {
            define_schema(
                self,
                [
                    char_field(&self.name, 40).unique(),
                    int_field(&self.moons),
                    float_field(&self.mass),
                ],
            )
        }
    }

    #[derive(Record, Default, Debug)]
    struct Comet {
        name: String,
    }

    impl Model for Comet {
        fn schema(&self) -> SchemaDefinition<Self> {
            define_schema(self, [char_field(&self.name, 40)])
        }
    }

    #[derive(Record, Default, Debug)]
    #[allow(non_camel_case_types)]
    struct planet {
        radius: i64,
    }

    impl Model for planet {
        fn schema(&self) -> SchemaDefinition<Self> {
            define_schema(self, [int_field(&self.radius)])
        }
    }

    fn register_planet() {
        registry::register([Planet::default().table()]).unwrap();
    }

    #[test]
    fn filters() {
        register_planet();
        let p = Planet::default();
        let writer = GenericSqlWriter;
        assert_eq!(
            p.filter([field(&p.moons).ge(2), field(&p.name).like("M%")])
                .unwrap()
                .sql(&writer)
                .unwrap(),
            "SELECT * FROM planet WHERE ( moons >= 2 AND  name LIKE 'M%')"
        );
        assert_eq!(
            p.or_filter([
                field(&p.name).is_in(["Mars".to_string(), "Earth".to_string()]),
                field(&p.mass).lt(0.5),
            ])
            .unwrap()
            .sql(&writer)
            .unwrap(),
            "SELECT * FROM planet WHERE ( name IN ('Mars', 'Earth') OR  mass < 0.5)"
        );
        assert_eq!(
            p.filter([field(&p.name).eq("O'Neil".into()).not()])
                .unwrap()
                .sql(&writer)
                .unwrap(),
            "SELECT * FROM planet WHERE (NOT name = 'O''Neil')"
        );
        assert_eq!(
            p.filter([column::<i32>("MOONS").between(1, 3)])
                .unwrap()
                .sql(&writer)
                .unwrap(),
            "SELECT * FROM planet WHERE ( moons BETWEEN 1 AND 3)"
        );
    }

    #[test]
    fn unresolved() {
        register_planet();
        let p = Planet::default();
        let other = Planet::default();
        let query = p.filter([field(&other.moons).gt(1)]).unwrap();
        assert!(matches!(
            query.error(),
            Some(FieldError::CantGetName { .. })
        ));
        assert!(query.sql(&GenericSqlWriter).is_err());
    }

    #[test]
    fn lookups() {
        register_planet();
        assert_eq!(registry::lookup::<Planet>().unwrap().table_name(), "planet");
        assert!(registry::registered_tables().contains(&"planet".to_string()));
        assert!(matches!(
            registry::lookup::<Comet>(),
            Err(TableError::NotRegistered { .. })
        ));
        let c = Comet::default();
        assert!(matches!(
            c.filter([]).unwrap_err().downcast_ref::<TableError>(),
            Some(TableError::NotRegistered { .. })
        ));
    }

    #[test]
    fn name_collision() {
        register_planet();
        let error = registry::register([planet::default().table()]).unwrap_err();
        assert_eq!(
            error.downcast_ref::<TableError>(),
            Some(&TableError::Duplicate {
                table: "planet".into(),
                existing: "Planet",
            })
        );
        // Same record again is fine
        register_planet();
    }
}
