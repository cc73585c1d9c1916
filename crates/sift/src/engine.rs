//! The query engine: full scans of a keyspace through a backing adapter.
//!
//! [`QueryEngine::execute`] runs the pipeline
//!
//! ```text
//! scan -> normalize -> sort (stable) -> filter -> skip offset -> take rows
//! ```
//!
//! and [`QueryEngine::count`] runs `scan -> normalize -> filter` only. Both
//! are synchronous and stateless apart from the engine's [`PathRegistry`],
//! which keeps property-path slot caches alive for the engine's lifetime.

use std::fmt;
use std::sync::OnceLock;

use crate::criteria::{self, Criteria, QueryDescription};
use crate::error::{QueryError, Result};
use crate::literal::Literal;
use crate::ordering::{stable_sort_by, Comparator, Sort};
use crate::path::PathRegistry;
use crate::query::Query;
use crate::record::Record;
use crate::sequence::{to_sequence, Scan};

/// Source of records, partitioned by keyspace.
///
/// The engine only ever asks for full scans.
pub trait KeyValueAdapter: Send + Sync {
    /// The records stored in this adapter.
    type Record: Record + Clone + Send + Sync;

    /// Returns every record in `keyspace`, or `None` if it does not exist.
    fn get_all_of(&self, keyspace: &str) -> Option<Scan<'_, Self::Record>>;
}

impl<A: KeyValueAdapter> KeyValueAdapter for std::sync::Arc<A> {
    type Record = A::Record;

    fn get_all_of(&self, keyspace: &str) -> Option<Scan<'_, Self::Record>> {
        (**self).get_all_of(keyspace)
    }
}

/// Executes queries against the keyspaces of one adapter.
///
/// # Example
///
/// ```
/// use sift::{AsValue, MemoryAdapter, Query, QueryEngine, Record, Value};
///
/// #[derive(Clone)]
/// struct Person { name: String, age: u32 }
///
/// impl Record for Person {
///     fn attributes(&self) -> &'static [&'static str] { &["name", "age"] }
///     fn attribute(&self, slot: usize) -> Value<'_> {
///         match slot {
///             0 => self.name.as_value(),
///             1 => self.age.as_value(),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// let adapter = MemoryAdapter::new();
/// adapter.put("people", Person { name: "bob".into(), age: 30 });
/// adapter.put("people", Person { name: "ann".into(), age: 25 });
///
/// let engine = QueryEngine::with_adapter(adapter);
/// let youngest = engine
///     .execute(&Query::new().order_asc("age").limit(1), "people")
///     .unwrap();
/// assert_eq!(youngest[0].name, "ann");
/// assert_eq!(engine.count(None, "people").unwrap(), 2);
/// ```
pub struct QueryEngine<A> {
    adapter: OnceLock<A>,
    paths: PathRegistry,
}

impl<A: KeyValueAdapter> QueryEngine<A> {
    /// Creates an engine with no adapter; attach one before querying.
    pub fn new() -> Self {
        QueryEngine {
            adapter: OnceLock::new(),
            paths: PathRegistry::new(),
        }
    }

    /// Creates an engine backed by `adapter`.
    pub fn with_adapter(adapter: A) -> Self {
        QueryEngine {
            adapter: OnceLock::from(adapter),
            paths: PathRegistry::new(),
        }
    }

    /// Attaches the backing adapter. An engine accepts exactly one.
    pub fn attach(&self, adapter: A) -> Result<()> {
        self.adapter
            .set(adapter)
            .map_err(|_| QueryError::AdapterAlreadyAttached)?;
        tracing::debug!("attached key/value adapter");
        Ok(())
    }

    /// The backing adapter.
    pub fn adapter(&self) -> Result<&A> {
        self.adapter.get().ok_or(QueryError::AdapterNotAttached)
    }

    /// The registry whose paths this engine's criteria and comparators share.
    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    /// Builds criteria from a parsed description using this engine's paths.
    pub fn criteria(
        &self,
        description: &QueryDescription,
        args: &[Literal],
    ) -> Result<Option<Criteria>> {
        criteria::assemble(description, args, &self.paths)
    }

    /// Builds a comparator for `sort` using this engine's paths.
    pub fn comparator(&self, sort: &Sort) -> Result<Comparator> {
        Comparator::from_sort(sort, &self.paths)
    }

    /// Runs `query` against every record in `keyspace`.
    ///
    /// Any evaluation error aborts the call; partial results are never
    /// returned.
    pub fn execute(&self, query: &Query, keyspace: &str) -> Result<Vec<A::Record>> {
        let adapter = self.adapter()?;
        let comparator = self.comparator(query.sort_spec())?;
        let records = to_sequence(adapter.get_all_of(keyspace));

        let matched = sort_and_filter(&records, query.get_criteria(), &comparator)?;
        let matched_len = matched.len();
        let page = window(matched, query);

        tracing::debug!(
            keyspace,
            scanned = records.len(),
            matched = matched_len,
            returned = page.len(),
            "executed query"
        );
        Ok(page.into_iter().cloned().collect())
    }

    /// Counts the records in `keyspace` matching `criteria`.
    ///
    /// Sort and paging never apply to a count.
    pub fn count(&self, criteria: Option<&Criteria>, keyspace: &str) -> Result<u64> {
        let adapter = self.adapter()?;
        let records = to_sequence(adapter.get_all_of(keyspace));
        let matched = count_matches(&records, criteria)?;

        tracing::debug!(keyspace, scanned = records.len(), matched, "counted query");
        Ok(matched as u64)
    }
}

impl<A: KeyValueAdapter> Default for QueryEngine<A> {
    fn default() -> Self {
        QueryEngine::new()
    }
}

impl<A> fmt::Debug for QueryEngine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEngine")
            .field("attached", &self.adapter.get().is_some())
            .field("paths", &self.paths)
            .finish()
    }
}

/// Full pipeline over a sequence already in memory.
pub(crate) fn select<'a, T: Record>(
    items: &'a [T],
    query: &Query,
    comparator: &Comparator,
) -> Result<Vec<&'a T>> {
    let matched = sort_and_filter(items, query.get_criteria(), comparator)?;
    Ok(window(matched, query))
}

/// Counts records matching `criteria`; `None` matches everything.
pub(crate) fn count_matches<T: Record>(items: &[T], criteria: Option<&Criteria>) -> Result<usize> {
    let Some(criteria) = criteria else {
        return Ok(items.len());
    };

    let mut matched = 0;
    for item in items {
        if criteria.matches(item)? {
            matched += 1;
        }
    }
    Ok(matched)
}

/// Stable-sorts references to `items`, then keeps those matching `criteria`.
fn sort_and_filter<'a, T: Record>(
    items: &'a [T],
    criteria: Option<&Criteria>,
    comparator: &Comparator,
) -> Result<Vec<&'a T>> {
    let mut ordered: Vec<&T> = items.iter().collect();
    if !comparator.is_empty() {
        stable_sort_by(&mut ordered, |a, b| comparator.compare(*a, *b))?;
    }

    let mut matched = Vec::with_capacity(ordered.len());
    for item in ordered {
        if criteria::matches(criteria, item)? {
            matched.push(item);
        }
    }
    Ok(matched)
}

/// Applies the offset/row window. Negative sentinels are no-ops.
fn window<T>(mut matched: Vec<T>, query: &Query) -> Vec<T> {
    if let Some(offset) = query.get_offset() {
        matched.drain(..offset.min(matched.len()));
    }
    if let Some(rows) = query.get_limit() {
        matched.truncate(rows);
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MemoryAdapter;
    use crate::op::Operator;
    use crate::ordering::OrderBy;
    use crate::record::AsValue;
    use crate::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: Option<String>,
    }

    impl Record for Item {
        fn attributes(&self) -> &'static [&'static str] {
            &["id", "label"]
        }

        fn attribute(&self, slot: usize) -> Value<'_> {
            match slot {
                0 => self.id.as_value(),
                1 => self.label.as_value(),
                _ => Value::Null,
            }
        }
    }

    fn item(id: u32, label: Option<&str>) -> Item {
        Item {
            id,
            label: label.map(str::to_string),
        }
    }

    fn engine() -> QueryEngine<MemoryAdapter<Item>> {
        let adapter = MemoryAdapter::new();
        adapter.put_all(
            "items",
            vec![item(3, Some("c")), item(1, None), item(2, Some("b"))],
        );
        QueryEngine::with_adapter(adapter)
    }

    fn ids(items: &[Item]) -> Vec<u32> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn unattached_engine_fails() {
        let engine: QueryEngine<MemoryAdapter<Item>> = QueryEngine::new();
        assert!(matches!(
            engine.execute(&Query::new(), "items"),
            Err(QueryError::AdapterNotAttached)
        ));
        assert!(matches!(
            engine.count(None, "items"),
            Err(QueryError::AdapterNotAttached)
        ));

        engine.attach(MemoryAdapter::new()).unwrap();
        assert!(matches!(
            engine.attach(MemoryAdapter::new()),
            Err(QueryError::AdapterAlreadyAttached)
        ));
        assert!(engine.execute(&Query::new(), "items").unwrap().is_empty());
    }

    #[test]
    fn missing_keyspace_is_empty() {
        let engine = engine();
        assert!(engine.execute(&Query::new(), "nope").unwrap().is_empty());
        assert_eq!(engine.count(None, "nope").unwrap(), 0);
    }

    #[test]
    fn unsorted_preserves_source_order() {
        let engine = engine();
        let results = engine.execute(&Query::new(), "items").unwrap();
        assert_eq!(ids(&results), vec![3, 1, 2]);
    }

    #[test]
    fn sort_then_window() {
        let engine = engine();
        let query = Query::new()
            .order(OrderBy::asc("label").nulls_last())
            .offset(1)
            .limit(5);
        let results = engine.execute(&query, "items").unwrap();
        assert_eq!(ids(&results), vec![3, 1]);
    }

    #[test]
    fn count_ignores_window() {
        let engine = engine();
        let criteria = engine
            .criteria(&QueryDescription::new().and("label", Operator::IsNotNull), &[])
            .unwrap();
        let query = Query::new().criteria(criteria.clone()).limit(1);

        assert_eq!(engine.execute(&query, "items").unwrap().len(), 1);
        assert_eq!(engine.count(criteria.as_ref(), "items").unwrap(), 2);
    }

    #[test]
    fn engine_shares_paths() {
        let engine = engine();
        engine
            .criteria(&QueryDescription::new().and("label", Operator::IsNull), &[])
            .unwrap();
        engine.comparator(&Sort::by(OrderBy::desc("label"))).unwrap();
        assert_eq!(engine.paths().len(), 1);
    }

    #[test]
    fn errors_abort_the_call() {
        let engine = engine();
        let query = Query::new().order_asc("missing");
        assert!(matches!(
            engine.execute(&query, "items"),
            Err(QueryError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn window_sentinels() {
        let mut query = Query::new();
        assert_eq!(window(vec![1, 2, 3], &query), vec![1, 2, 3]);

        query.set_offset(0);
        query.set_rows(2);
        assert_eq!(window(vec![1, 2, 3], &query), vec![1, 2]);

        query.set_offset(5);
        assert!(window(vec![1, 2, 3], &query).is_empty());
    }
}
