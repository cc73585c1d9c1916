//! Query requests.
//!
//! A [`Query`] bundles optional [`Criteria`], a [`Sort`] and the offset/row
//! window. It is a passive value: [`QueryEngine::execute`] runs it against a
//! keyspace, and [`Query::filter`] runs it against a slice you already hold.
//!
//! [`QueryEngine::execute`]: crate::QueryEngine::execute

use crate::criteria::{self, Criteria};
use crate::engine;
use crate::error::Result;
use crate::ordering::{build_comparator, Dir, OrderBy, Sort};
use crate::record::Record;

/// Offset/row value meaning "not set".
const UNSET: i64 = -1;

/// A query for filtering, ordering and paginating records.
///
/// Offset and rows are stored as signed sentinels: any negative value means
/// "no skip" and "unbounded" respectively.
///
/// # Example
///
/// ```
/// use sift::{Operator, Query, QueryDescription, Literal, PathRegistry, assemble};
///
/// let registry = PathRegistry::new();
/// let criteria = assemble(
///     &QueryDescription::new().and("age", Operator::GreaterThan),
///     &[Literal::from(18)],
///     &registry,
/// )
/// .unwrap();
///
/// let query = Query::new()
///     .criteria(criteria)
///     .order_desc("age")
///     .order_asc("name")
///     .offset(10)
///     .limit(20)
///     .build();
///
/// assert_eq!(query.get_offset(), Some(10));
/// assert_eq!(query.get_limit(), Some(20));
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    criteria: Option<Criteria>,
    sort: Sort,
    offset: i64,
    rows: i64,
}

impl Default for Query {
    fn default() -> Self {
        Query {
            criteria: None,
            sort: Sort::unsorted(),
            offset: UNSET,
            rows: UNSET,
        }
    }
}

impl Query {
    /// Creates a new empty query.
    ///
    /// An empty query returns every record in source order.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a query with the given criteria.
    pub fn with_criteria(criteria: Criteria) -> Self {
        Query::new().criteria(criteria)
    }

    // ========================================================================
    // Criteria
    // ========================================================================

    /// Sets the criteria. `None` matches everything.
    pub fn criteria(mut self, criteria: impl Into<Option<Criteria>>) -> Self {
        self.criteria = criteria.into();
        self
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Adds an ordering key with nulls first.
    pub fn order_by(self, property: &str, dir: Dir) -> Self {
        self.order(OrderBy::new(property, dir))
    }

    /// Adds an ascending ordering key.
    pub fn order_asc(self, property: &str) -> Self {
        self.order_by(property, Dir::Asc)
    }

    /// Adds a descending ordering key.
    pub fn order_desc(self, property: &str) -> Self {
        self.order_by(property, Dir::Desc)
    }

    /// Adds a fully specified ordering key.
    pub fn order(mut self, order: OrderBy) -> Self {
        self.sort.push(order);
        self
    }

    /// Replaces the sort.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    // ========================================================================
    // Limits
    // ========================================================================

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, n: usize) -> Self {
        self.rows = to_sentinel(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = to_sentinel(n);
        self
    }

    /// Selects page `index` (zero-based) of `size` results.
    pub fn page(self, index: usize, size: usize) -> Self {
        self.offset(index.saturating_mul(size)).limit(size)
    }

    /// Sets the raw offset; negative means no skip.
    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// Sets the raw row limit; negative means unbounded.
    pub fn set_rows(&mut self, rows: i64) {
        self.rows = rows;
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the criteria, if any.
    pub fn get_criteria(&self) -> Option<&Criteria> {
        self.criteria.as_ref()
    }

    /// Returns the sort.
    pub fn sort_spec(&self) -> &Sort {
        &self.sort
    }

    /// Returns the offset, if set.
    pub fn get_offset(&self) -> Option<usize> {
        usize::try_from(self.offset).ok()
    }

    /// Returns the limit, if set.
    pub fn get_limit(&self) -> Option<usize> {
        usize::try_from(self.rows).ok()
    }

    /// Returns the raw offset sentinel.
    pub fn raw_offset(&self) -> i64 {
        self.offset
    }

    /// Returns the raw row sentinel.
    pub fn raw_rows(&self) -> i64 {
        self.rows
    }

    /// Returns `true` if this query has no criteria (matches everything).
    pub fn is_empty(&self) -> bool {
        self.criteria.is_none()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single record matches this query's criteria.
    pub fn matches(&self, record: &dyn Record) -> Result<bool> {
        criteria::matches(self.get_criteria(), record)
    }

    /// Runs this query over `items`: sort, filter, skip, limit.
    ///
    /// Paths are resolved with a comparator private to this call; use a
    /// [`QueryEngine`] to keep path caches across calls.
    ///
    /// [`QueryEngine`]: crate::QueryEngine
    pub fn filter<'a, T: Record>(&self, items: &'a [T]) -> Result<Vec<&'a T>> {
        let comparator = build_comparator(&self.sort)?;
        engine::select(items, self, &comparator)
    }

    /// Like [`filter`](Self::filter), but clones the results.
    pub fn filter_cloned<T: Record + Clone>(&self, items: &[T]) -> Result<Vec<T>> {
        Ok(self.filter(items)?.into_iter().cloned().collect())
    }

    /// Counts matching records, ignoring sort and paging.
    pub fn count<T: Record>(&self, items: &[T]) -> Result<usize> {
        engine::count_matches(items, self.get_criteria())
    }
}

fn to_sentinel(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
