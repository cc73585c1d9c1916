//! Ordering types for query result sorting.
//!
//! Provides [`Dir`] and [`Nulls`] for a single sort key, [`OrderBy`] and
//! [`Sort`] to describe a sort, and [`Comparator`] to execute one against
//! records.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{QueryError, Result};
use crate::path::{PathRegistry, PropertyPath};
use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where null sort keys go, independent of [`Dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nulls {
    /// Null keys sort before every non-null key.
    #[default]
    First,
    /// Null keys sort after every non-null key.
    Last,
}

impl Nulls {
    /// Ordering of a null key against a non-null key.
    pub fn null_vs_value(self) -> Ordering {
        match self {
            Nulls::First => Ordering::Less,
            Nulls::Last => Ordering::Greater,
        }
    }

    /// Returns the display name of this placement.
    pub fn as_str(self) -> &'static str {
        match self {
            Nulls::First => "nulls first",
            Nulls::Last => "nulls last",
        }
    }
}

/// A single ordering clause: property, direction and null placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The dotted property path to sort by.
    pub property: String,
    /// The sort direction.
    pub dir: Dir,
    /// Placement of null keys.
    pub nulls: Nulls,
}

impl OrderBy {
    /// Creates a new ordering with the given direction, nulls first.
    pub fn new(property: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            property: property.into(),
            dir,
            nulls: Nulls::default(),
        }
    }

    /// Creates a new ascending ordering for the given property.
    pub fn asc(property: impl Into<String>) -> Self {
        OrderBy::new(property, Dir::Asc)
    }

    /// Creates a new descending ordering for the given property.
    pub fn desc(property: impl Into<String>) -> Self {
        OrderBy::new(property, Dir::Desc)
    }

    /// Places null keys before non-null keys.
    pub fn nulls_first(mut self) -> Self {
        self.nulls = Nulls::First;
        self
    }

    /// Places null keys after non-null keys.
    pub fn nulls_last(mut self) -> Self {
        self.nulls = Nulls::Last;
        self
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.property, self.dir, self.nulls.as_str())
    }
}

/// An ordered list of sort keys. Empty means "keep source order".
///
/// ```
/// use sift::{OrderBy, Sort};
///
/// let sort = Sort::by(OrderBy::desc("age")).then(OrderBy::asc("name").nulls_last());
/// assert_eq!(sort.orders().len(), 2);
/// assert!(Sort::unsorted().is_unsorted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<OrderBy>,
}

impl Sort {
    /// A sort with no keys.
    pub fn unsorted() -> Self {
        Sort::default()
    }

    /// A sort with a single key.
    pub fn by(order: OrderBy) -> Self {
        Sort {
            orders: vec![order],
        }
    }

    /// Appends a tie-breaking key.
    pub fn then(mut self, order: OrderBy) -> Self {
        self.orders.push(order);
        self
    }

    /// Appends a tie-breaking key in place.
    pub fn push(&mut self, order: OrderBy) {
        self.orders.push(order);
    }

    /// The keys, primary first.
    pub fn orders(&self) -> &[OrderBy] {
        &self.orders
    }

    /// Returns `true` if there are no keys.
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}

impl FromIterator<OrderBy> for Sort {
    fn from_iter<I: IntoIterator<Item = OrderBy>>(iter: I) -> Self {
        Sort {
            orders: iter.into_iter().collect(),
        }
    }
}

/// Natural ordering of two non-null values.
///
/// Strings compare lexically, numbers across representations, timestamps
/// chronologically and `false < true`. Any other pairing (including lists,
/// maps and records) fails with [`QueryError::Incomparable`].
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Result<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => Ok(a.compare(*b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Ok(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        _ => Err(QueryError::Incomparable {
            left: a.kind(),
            right: b.kind(),
        }),
    }
}

/// Compares two records by one property.
#[derive(Debug, Clone)]
pub struct PathComparator {
    path: Arc<PropertyPath>,
    dir: Dir,
    nulls: Nulls,
}

impl PathComparator {
    /// Creates a comparator for `path`.
    pub fn new(path: Arc<PropertyPath>, dir: Dir, nulls: Nulls) -> Self {
        PathComparator { path, dir, nulls }
    }

    /// The property compared.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// The sort direction.
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// The null placement.
    pub fn nulls(&self) -> Nulls {
        self.nulls
    }

    /// Compares `a` and `b` by this comparator's property.
    ///
    /// Null placement is applied before, and independently of, direction.
    pub fn compare(&self, a: &dyn Record, b: &dyn Record) -> Result<Ordering> {
        let left = self.path.resolve(a)?;
        let right = self.path.resolve(b)?;

        Ok(match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => self.nulls.null_vs_value(),
            (Some(_), None) => self.nulls.null_vs_value().reverse(),
            (Some(left), Some(right)) => self.dir.apply(compare_values(&left, &right)?),
        })
    }
}

/// A multi-key comparator: the first key decides, later keys break ties.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    keys: Vec<PathComparator>,
}

impl Comparator {
    /// A comparator with no keys; every pair compares equal.
    pub fn new() -> Self {
        Comparator::default()
    }

    /// Builds a comparator for `sort`, sharing paths through `registry`.
    pub fn from_sort(sort: &Sort, registry: &PathRegistry) -> Result<Self> {
        sort.orders()
            .iter()
            .try_fold(Comparator::new(), |comparator, order| {
                let path = registry.path(&order.property)?;
                Ok(comparator.then(PathComparator::new(path, order.dir, order.nulls)))
            })
    }

    /// Appends a tie-breaking key.
    pub fn then(mut self, key: PathComparator) -> Self {
        self.keys.push(key);
        self
    }

    /// The keys, primary first.
    pub fn keys(&self) -> &[PathComparator] {
        &self.keys
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compares two records key by key.
    pub fn compare(&self, a: &dyn Record, b: &dyn Record) -> Result<Ordering> {
        for key in &self.keys {
            let ordering = key.compare(a, b)?;
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }

    /// Stable-sorts `items` in place.
    ///
    /// If any comparison fails the first error is returned; the slice is
    /// then left in an unspecified order.
    pub fn sort<T: Record>(&self, items: &mut [T]) -> Result<()> {
        stable_sort_by(items, |a, b| self.compare(a, b))
    }
}

/// Builds a standalone comparator for `sort`.
///
/// Useful to sort records without filtering them. Paths are cached only for
/// the returned comparator; use [`QueryEngine::comparator`] to share the
/// engine's caches.
///
/// [`QueryEngine::comparator`]: crate::QueryEngine::comparator
pub fn build_comparator(sort: &Sort) -> Result<Comparator> {
    Comparator::from_sort(sort, &PathRegistry::new())
}

/// Stable sort with a fallible comparison; the first error wins.
pub(crate) fn stable_sort_by<T, F>(items: &mut [T], mut compare: F) -> Result<()>
where
    F: FnMut(&T, &T) -> Result<Ordering>,
{
    let mut failure = None;
    items.sort_by(|a, b| {
        if failure.is_some() {
            return Ordering::Equal;
        }
        compare(a, b).unwrap_or_else(|err| {
            failure = Some(err);
            Ordering::Equal
        })
    });
    failure.map_or(Ok(()), Err)
}
