//! Sift - embedded query engine for keyspace record collections.
//!
//! Sift filters, sorts and paginates the records a key/value adapter holds,
//! by full scan. It supports:
//!
//! - Nested attribute access through dotted property paths, with per-type
//!   slot caches
//! - A closed operator set: equality, ordering, between, prefix/suffix,
//!   containment, regex, membership, null and boolean checks
//! - AND/OR criteria trees assembled from parsed query descriptions
//! - Multi-key sorting with per-key direction and null placement
//! - Offset and row limits
//!
//! # Quick Start
//!
//! ```rust
//! use sift::{
//!     AsValue, Literal, MemoryAdapter, Operator, OrderBy, Query, QueryDescription,
//!     QueryEngine, Record, Value,
//! };
//!
//! // Describe your records
//! #[derive(Clone)]
//! struct Person {
//!     firstname: Option<String>,
//!     age: u32,
//! }
//!
//! impl Record for Person {
//!     fn attributes(&self) -> &'static [&'static str] {
//!         &["firstname", "age"]
//!     }
//!
//!     fn attribute(&self, slot: usize) -> Value<'_> {
//!         match slot {
//!             0 => self.firstname.as_value(),
//!             1 => self.age.as_value(),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! // Store them
//! let adapter = MemoryAdapter::new();
//! for (name, age) in [(Some("bob"), 42), (None, 30), (Some("winston"), 7)] {
//!     adapter.put("people", Person { firstname: name.map(Into::into), age });
//! }
//! let engine = QueryEngine::with_adapter(adapter);
//!
//! // findByAgeGreaterThanOrFirstnameIsNull, sorted by name with nulls last
//! let criteria = engine
//!     .criteria(
//!         &QueryDescription::new()
//!             .and("age", Operator::GreaterThan)
//!             .or("firstname", Operator::IsNull),
//!         &[Literal::from(10)],
//!     )
//!     .unwrap();
//!
//! let query = Query::new()
//!     .criteria(criteria)
//!     .order(OrderBy::asc("firstname").nulls_last())
//!     .build();
//!
//! let people = engine.execute(&query, "people").unwrap();
//! assert_eq!(people.len(), 2);
//! assert_eq!(people[0].firstname.as_deref(), Some("bob"));
//! assert_eq!(people[1].firstname, None);
//! ```
//!
//! # Criteria Semantics
//!
//! Parts of a [`QueryDescription`] are folded left to right, AND binding
//! tighter than OR:
//!
//! ```text
//! a AND b OR c   =>   (a AND b) OR c
//! ```
//!
//! An absent criteria tree matches every record.
//!
//! # Null Handling
//!
//! - A property path yields null as soon as any segment is null.
//! - Equality is null-safe: `Equals(null)` matches null attributes.
//! - Ordering operators never match a null attribute.
//! - Sort keys place nulls first or last regardless of direction.
//!
//! # Operators
//!
//! | Operator | Arguments | Applies to |
//! |----------|-----------|------------|
//! | `Equals`, `NotEquals` | 1 | any value, strings optionally ignoring case |
//! | `IsNull`, `IsNotNull` | 0 | any value |
//! | `IsTrue`, `IsFalse` | 0 | booleans |
//! | `GreaterThan`, `GreaterThanEqual`, `LessThan`, `LessThanEqual`, `Before`, `After` | 1 | strings, numbers, timestamps, booleans |
//! | `Between` | 2 | as above, exclusive bounds |
//! | `StartsWith`, `EndsWith` | 1 | strings |
//! | `Contains`, `Like` | 1 | strings, lists, maps, string forms |
//! | `Matches` | 1 | strings |
//! | `In`, `NotIn` | 1 (list) | any value |
//!
//! # Logging
//!
//! Sift emits [`tracing`] events (`debug` per query, `trace` per cached
//! path slot). It never installs a subscriber.
//!
//! # Derive
//!
//! With the default `derive` feature, `#[derive(Record)]` implements
//! [`Record`] and [`AsValue`] from a struct's fields.

mod adapter;
pub mod criteria;
mod engine;
mod error;
mod literal;
mod op;
mod ordering;
mod path;
pub mod predicate;
mod query;
mod record;
mod sequence;
mod value;

// Re-export public API
pub use adapter::MemoryAdapter;
pub use criteria::{assemble, Connector, Criteria, Part, QueryDescription};
pub use engine::{KeyValueAdapter, QueryEngine};
pub use error::{QueryError, Result};
pub use literal::Literal;
pub use op::Operator;
pub use ordering::{
    build_comparator, compare_values, Comparator, Dir, Nulls, OrderBy, PathComparator, Sort,
};
pub use path::{PathRegistry, PropertyPath};
pub use predicate::Predicate;
pub use query::Query;
pub use record::{AsValue, Record};
pub use sequence::{to_sequence, Scan};
pub use value::{Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use sift_macros::Record;
