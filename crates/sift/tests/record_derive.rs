//! Tests for the `#[derive(Record)]` macro.

#![cfg(feature = "derive")]

use sift::{
    AsValue, Literal, MemoryAdapter, Operator, OrderBy, PathRegistry, Query, QueryDescription,
    QueryEngine, Record, Timestamp, Value,
};

#[derive(Debug, Clone, PartialEq, Record)]
struct Address {
    city: String,
    zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Record)]
struct Person {
    #[record(rename = "firstname")]
    first_name: Option<String>,
    age: u32,
    active: bool,
    tags: Vec<String>,
    address: Option<Address>,
    joined: Timestamp,
    #[record(skip)]
    #[allow(dead_code)]
    password_hash: String,
}

#[derive(Debug, Clone, Record)]
struct Marker;

fn person(name: &str, age: u32, city: Option<&str>) -> Person {
    Person {
        first_name: Some(name.to_string()),
        age,
        active: age >= 18,
        tags: vec![format!("age-{age}")],
        address: city.map(|city| Address {
            city: city.to_string(),
            zip: None,
        }),
        joined: Timestamp(i64::from(age) * 1000),
        password_hash: "secret".to_string(),
    }
}

#[test]
fn attributes_follow_field_order() {
    let p = person("ann", 30, None);
    assert_eq!(
        p.attributes(),
        &["firstname", "age", "active", "tags", "address", "joined"]
    );
    assert_eq!(p.get("password_hash"), None);
    assert_eq!(p.get("first_name"), None);
    assert_eq!(p.get("firstname"), Some(Value::String("ann")));
    assert_eq!(p.get("joined"), Some(Value::Timestamp(Timestamp(30_000))));
}

#[test]
fn generates_name_constants() {
    assert_eq!(Person::FIRSTNAME, "firstname");
    assert_eq!(Person::AGE, "age");
    assert_eq!(Address::CITY, "city");
}

#[test]
fn unit_structs_have_no_attributes() {
    assert!(Marker.attributes().is_empty());
    assert_eq!(Marker.get("anything"), None);
}

#[test]
fn nested_records_resolve_through_paths() {
    let registry = PathRegistry::new();
    let city = registry.path("address.city").unwrap();

    let housed = person("ann", 30, Some("Oslo"));
    let homeless = person("bob", 40, None);

    assert_eq!(city.resolve(&housed).unwrap(), Some(Value::String("Oslo")));
    assert_eq!(city.resolve(&homeless).unwrap(), None);
    assert!(housed.get("address").is_some_and(|v| v.is_record()));
    assert!(housed.as_value().is_record());
}

#[test]
fn derived_records_drive_queries() {
    let adapter = MemoryAdapter::new();
    adapter.put_all(
        "people",
        vec![
            person("ann", 30, Some("Oslo")),
            person("bob", 12, Some("Bergen")),
            person("cid", 45, None),
            person("dee", 22, Some("Oslo")),
        ],
    );
    let engine = QueryEngine::with_adapter(adapter);

    let criteria = engine
        .criteria(
            &QueryDescription::new()
                .and(Person::ACTIVE, Operator::IsTrue)
                .and("address.city", Operator::Equals)
                .or(Person::TAGS, Operator::Contains),
            &["Oslo".into(), "age-12".into()],
        )
        .unwrap();

    let query = Query::new()
        .criteria(criteria)
        .order(OrderBy::desc(Person::AGE));
    let results = engine.execute(&query, "people").unwrap();

    let names: Vec<_> = results
        .iter()
        .filter_map(|p| p.first_name.as_deref())
        .collect();
    assert_eq!(names, vec!["ann", "dee", "bob"]);
}

#[test]
fn in_operator_over_derived_numbers() {
    let people = vec![
        person("ann", 30, None),
        person("bob", 12, None),
        person("cid", 45, None),
    ];
    let registry = PathRegistry::new();
    let criteria = sift::assemble(
        &QueryDescription::new().and(Person::AGE, Operator::In),
        &[Literal::from(vec![12, 45])],
        &registry,
    )
    .unwrap();

    let query = Query::new().criteria(criteria).order_asc(Person::FIRSTNAME);
    let picked: Vec<_> = query.filter(&people).unwrap();
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[0].age, 12);
    assert_eq!(picked[1].age, 45);
}
