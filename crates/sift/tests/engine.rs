//! End-to-end scenarios for the query engine.

use std::collections::HashMap;
use std::sync::Arc;

use sift::{
    AsValue, Criteria, Dir, Literal, MemoryAdapter, Nulls, Operator, OrderBy, PathComparator,
    Query, QueryDescription, QueryEngine, QueryError, Record, Sort, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: Option<String>,
    age: u32,
    address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq)]
struct Address {
    city: String,
}

impl Record for Address {
    fn attributes(&self) -> &'static [&'static str] {
        &["city"]
    }

    fn attribute(&self, slot: usize) -> Value<'_> {
        match slot {
            0 => self.city.as_value(),
            _ => Value::Null,
        }
    }
}

impl Record for Person {
    fn attributes(&self) -> &'static [&'static str] {
        &["name", "age", "address"]
    }

    fn attribute(&self, slot: usize) -> Value<'_> {
        match (slot, &self.address) {
            (0, _) => self.name.as_value(),
            (1, _) => self.age.as_value(),
            (2, Some(address)) => Value::Record(address),
            _ => Value::Null,
        }
    }
}

fn person(name: Option<&str>, age: u32) -> Person {
    Person {
        name: name.map(str::to_string),
        age,
        address: None,
    }
}

fn living_in(mut person: Person, city: &str) -> Person {
    person.address = Some(Address {
        city: city.to_string(),
    });
    person
}

/// bob (30), an unnamed person (25) and winston (35), in that order.
fn people_engine() -> QueryEngine<MemoryAdapter<Person>> {
    let adapter = MemoryAdapter::new();
    adapter.put_all(
        "people",
        vec![
            person(Some("bob"), 30),
            person(None, 25),
            person(Some("winston"), 35),
        ],
    );
    QueryEngine::with_adapter(adapter)
}

fn criteria(
    engine: &QueryEngine<MemoryAdapter<Person>>,
    description: QueryDescription,
    args: &[Literal],
) -> Criteria {
    engine
        .criteria(&description, args)
        .unwrap()
        .expect("description has parts")
}

fn names(people: &[Person]) -> Vec<Option<&str>> {
    people.iter().map(|p| p.name.as_deref()).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn not_null_sorted_by_age_descending() {
    let engine = people_engine();
    let named = criteria(
        &engine,
        QueryDescription::new().and("name", Operator::IsNotNull),
        &[],
    );

    let query = Query::with_criteria(named.clone()).order_desc("age");
    let results = engine.execute(&query, "people").unwrap();

    assert_eq!(names(&results), vec![Some("winston"), Some("bob")]);
    assert_eq!(engine.count(Some(&named), "people").unwrap(), 2);
}

#[test]
fn membership_in_list() {
    let engine = people_engine();
    let wanted = criteria(
        &engine,
        QueryDescription::new().and("name", Operator::In),
        &[Literal::from(vec!["bob", "mike"])],
    );

    let results = engine
        .execute(&Query::with_criteria(wanted), "people")
        .unwrap();
    assert_eq!(names(&results), vec![Some("bob")]);
}

#[test]
fn offset_and_limit_preserve_source_order() {
    let engine = people_engine();
    let query = Query::new().offset(1).limit(1);

    let results = engine.execute(&query, "people").unwrap();
    assert_eq!(results, vec![person(None, 25)]);
}

#[test]
fn execute_length_equals_count() {
    let engine = people_engine();
    let older = criteria(
        &engine,
        QueryDescription::new().and("age", Operator::GreaterThanEqual),
        &[Literal::from(30)],
    );

    let mut query = Query::with_criteria(older.clone()).order_asc("name");
    query.set_offset(0);
    let results = engine.execute(&query, "people").unwrap();

    assert_eq!(
        results.len() as u64,
        engine.count(Some(&older), "people").unwrap()
    );
    assert_eq!(engine.count(None, "people").unwrap(), 3);
}

#[test]
fn execute_is_idempotent() {
    let engine = people_engine();
    let query = Query::new()
        .order(OrderBy::desc("name").nulls_last())
        .limit(2);

    let first = engine.execute(&query, "people").unwrap();
    let second = engine.execute(&query, "people").unwrap();
    assert_eq!(first, second);
    assert_eq!(names(&first), vec![Some("winston"), Some("bob")]);
}

#[test]
fn case_insensitive_equality() {
    let engine = people_engine();

    let loose = engine
        .criteria(
            &QueryDescription::new().part(
                sift::Part::new(sift::Connector::And, "name", Operator::Equals).ignoring_case(),
            ),
            &["Bob".into()],
        )
        .unwrap();
    let strict = engine
        .criteria(
            &QueryDescription::new().and("name", Operator::Equals),
            &["Bob".into()],
        )
        .unwrap();

    assert_eq!(engine.count(loose.as_ref(), "people").unwrap(), 1);
    assert_eq!(engine.count(strict.as_ref(), "people").unwrap(), 0);
}

#[test]
fn null_placement_ignores_direction() {
    let path = Arc::new(sift::PropertyPath::parse("name").unwrap());
    let unnamed = person(None, 1);
    let named = person(Some("a"), 1);

    for dir in [Dir::Asc, Dir::Desc] {
        let comparator = PathComparator::new(path.clone(), dir, Nulls::First);
        assert_eq!(
            comparator.compare(&unnamed, &named).unwrap(),
            std::cmp::Ordering::Less
        );
    }

    let engine = people_engine();
    for order in [OrderBy::asc("name"), OrderBy::desc("name")] {
        let results = engine
            .execute(&Query::new().order(order), "people")
            .unwrap();
        assert_eq!(results[0].name, None);
    }
}

// ============================================================================
// Nested paths
// ============================================================================

#[test]
fn nested_paths_filter_and_sort() {
    let adapter = MemoryAdapter::new();
    adapter.put_all(
        "people",
        vec![
            living_in(person(Some("ann"), 40), "Oslo"),
            person(Some("bob"), 30),
            living_in(person(Some("cid"), 20), "Bergen"),
        ],
    );
    let engine = QueryEngine::with_adapter(adapter);

    let in_city = engine
        .criteria(
            &QueryDescription::new().and("address.city", Operator::StartsWith),
            &["O".into()],
        )
        .unwrap();
    let results = engine
        .execute(&Query::new().criteria(in_city), "people")
        .unwrap();
    assert_eq!(names(&results), vec![Some("ann")]);

    let sorted = engine
        .execute(
            &Query::new().order(OrderBy::asc("address.city").nulls_last()),
            "people",
        )
        .unwrap();
    assert_eq!(names(&sorted), vec![Some("cid"), Some("ann"), Some("bob")]);

    let homeless = engine
        .criteria(
            &QueryDescription::new().and("address.city", Operator::IsNull),
            &[],
        )
        .unwrap();
    assert_eq!(engine.count(homeless.as_ref(), "people").unwrap(), 1);
}

#[test]
fn heterogeneous_keyspace() {
    #[derive(Debug)]
    struct Robot {
        name: String,
        serial: u64,
    }

    impl Record for Robot {
        fn attributes(&self) -> &'static [&'static str] {
            &["serial", "name"]
        }

        fn attribute(&self, slot: usize) -> Value<'_> {
            match slot {
                0 => self.serial.as_value(),
                1 => self.name.as_value(),
                _ => Value::Null,
            }
        }
    }

    let mut store: HashMap<String, Vec<Arc<dyn Record + Send + Sync>>> = HashMap::new();
    store.insert(
        "things".to_string(),
        vec![
            Arc::new(person(Some("bob"), 30)),
            Arc::new(Robot {
                name: "r2".to_string(),
                serial: 2,
            }),
            Arc::new(person(Some("al"), 50)),
        ],
    );
    let engine = QueryEngine::with_adapter(store);

    // "name" lives in a different slot on each type
    let results = engine
        .execute(&Query::new().order_asc("name"), "things")
        .unwrap();
    let sorted: Vec<_> = results
        .iter()
        .map(|r| r.get("name").unwrap().to_string())
        .collect();
    assert_eq!(sorted, vec!["al", "bob", "r2"]);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn unknown_attribute_fails_the_call() {
    let engine = people_engine();
    let bad = criteria(
        &engine,
        QueryDescription::new().and("nickname", Operator::IsNull),
        &[],
    );

    assert!(matches!(
        engine.execute(&Query::with_criteria(bad.clone()), "people"),
        Err(QueryError::UnknownAttribute { .. })
    ));
    assert!(engine.count(Some(&bad), "people").is_err());
}

#[test]
fn incomparable_range_fails_the_call() {
    let engine = people_engine();
    let older_than_name = criteria(
        &engine,
        QueryDescription::new().and("age", Operator::GreaterThan),
        &["thirty".into()],
    );

    let result = engine.execute(&Query::with_criteria(older_than_name), "people");
    assert!(matches!(
        result,
        Err(QueryError::Incomparable {
            left: "number",
            right: "string"
        })
    ));
}

#[test]
fn incomparable_sort_keys_fail_the_call() {
    #[derive(Debug)]
    struct Numbered {
        name: i64,
    }

    impl Record for Numbered {
        fn attributes(&self) -> &'static [&'static str] {
            &["name"]
        }

        fn attribute(&self, slot: usize) -> Value<'_> {
            match slot {
                0 => self.name.as_value(),
                _ => Value::Null,
            }
        }
    }

    let mut records: Vec<Arc<dyn Record + Send + Sync>> = (0..200)
        .map(|n| Arc::new(Numbered { name: n }) as Arc<dyn Record + Send + Sync>)
        .collect();
    records.insert(117, Arc::new(person(Some("bob"), 30)));

    let mut store: HashMap<String, Vec<Arc<dyn Record + Send + Sync>>> = HashMap::new();
    store.insert("mixed".to_string(), records);
    let engine = QueryEngine::with_adapter(store);

    for query in [
        Query::new().order_asc("name"),
        Query::new().order_desc("name").limit(1),
    ] {
        let result = engine.execute(&query, "mixed");
        assert!(matches!(result, Err(QueryError::Incomparable { .. })));
    }

    // count ignores the sort
    assert_eq!(engine.count(None, "mixed").unwrap(), 201);
}

#[test]
fn unsupported_operator_fails_at_build() {
    let engine = people_engine();
    let result = engine.criteria(&QueryDescription::new().and("age", Operator::Near), &[]);
    assert!(matches!(
        result,
        Err(QueryError::UnsupportedOperator { operator: "near" })
    ));
}

#[test]
fn shared_engine_across_threads() {
    let engine = Arc::new(people_engine());
    let sort = Sort::by(OrderBy::asc("age"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let query = Query::new().sort(sort.clone());
            std::thread::spawn(move || engine.execute(&query, "people").unwrap())
        })
        .collect();

    for handle in handles {
        let results = handle.join().unwrap();
        assert_eq!(
            results.iter().map(|p| p.age).collect::<Vec<_>>(),
            vec![25, 30, 35]
        );
    }
}
