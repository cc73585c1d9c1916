//! Property paths: dotted attribute chains resolved against records.
//!
//! A [`PropertyPath`] such as `address.city` is resolved segment by segment.
//! Each segment caches, per record type, the slot its attribute lives in, so
//! name lookups happen once per type rather than once per record.
//!
//! The caches are guarded by `RwLock`s. Two threads racing to resolve the
//! same segment for a new type both compute the same slot; whichever write
//! lands last wins, and both results are identical.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{QueryError, Result};
use crate::record::Record;
use crate::value::Value;

/// A dotted chain of attribute names.
///
/// # Example
///
/// ```
/// use sift::{AsValue, PropertyPath, Record, Value};
///
/// struct City { name: String }
/// struct Person { city: Option<City> }
///
/// impl Record for City {
///     fn attributes(&self) -> &'static [&'static str] { &["name"] }
///     fn attribute(&self, slot: usize) -> Value<'_> {
///         match slot { 0 => self.name.as_value(), _ => Value::Null }
///     }
/// }
///
/// impl Record for Person {
///     fn attributes(&self) -> &'static [&'static str] { &["city"] }
///     fn attribute(&self, slot: usize) -> Value<'_> {
///         match (slot, &self.city) {
///             (0, Some(city)) => Value::Record(city),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// let path = PropertyPath::parse("city.name").unwrap();
///
/// let here = Person { city: Some(City { name: "Oslo".into() }) };
/// assert_eq!(path.resolve(&here).unwrap(), Some(Value::String("Oslo")));
///
/// let nowhere = Person { city: None };
/// assert_eq!(path.resolve(&nowhere).unwrap(), None);
/// ```
pub struct PropertyPath {
    dotted: String,
    segments: Vec<Segment>,
}

struct Segment {
    name: String,
    slots: RwLock<HashMap<TypeId, usize>>,
}

impl Segment {
    fn new(name: &str) -> Self {
        Segment {
            name: name.to_string(),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the slot of this segment's attribute on `record`'s type.
    fn slot(&self, record: &dyn Record) -> Result<usize> {
        let record_type = record.record_type();

        let cached = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&record_type)
            .copied();
        if let Some(slot) = cached {
            return Ok(slot);
        }

        let slot = record
            .slot_of(&self.name)
            .ok_or_else(|| QueryError::UnknownAttribute {
                attribute: self.name.clone(),
                record: record.record_name(),
            })?;

        tracing::trace!(
            attribute = %self.name,
            record = record.record_name(),
            slot,
            "cached attribute slot"
        );
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record_type, slot);

        Ok(slot)
    }
}

impl PropertyPath {
    /// Parses a dotted path.
    ///
    /// Fails with [`QueryError::InvalidPath`] if the path or any of its
    /// segments is empty.
    pub fn parse(dotted: &str) -> Result<Self> {
        let segments: Vec<Segment> = dotted.split('.').map(Segment::new).collect();

        if segments.iter().any(|s| s.name.trim().is_empty()) {
            return Err(QueryError::InvalidPath {
                path: dotted.to_string(),
            });
        }

        Ok(PropertyPath {
            dotted: dotted.to_string(),
            segments,
        })
    }

    /// The dotted form of this path.
    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    /// The attribute names, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.name.as_str())
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`: a parsed path has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolves this path against `root`.
    ///
    /// Returns `Ok(None)` as soon as a segment yields null; the remaining
    /// segments are not inspected. An attribute missing from a record type
    /// is an error, not a null.
    pub fn resolve<'a>(&self, root: &'a dyn Record) -> Result<Option<Value<'a>>> {
        let mut current = root;
        let last = self.segments.len() - 1;

        for (depth, segment) in self.segments.iter().enumerate() {
            let slot = segment.slot(current)?;
            let value = current.attribute(slot);

            if value.is_null() {
                return Ok(None);
            }
            if depth == last {
                return Ok(Some(value));
            }

            current = match value {
                Value::Record(next) => next,
                other => {
                    return Err(QueryError::NotARecord {
                        attribute: self.segments[depth + 1].name.clone(),
                        found: other.kind(),
                    })
                }
            };
        }

        Ok(None)
    }
}

impl fmt::Debug for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyPath").field(&self.dotted).finish()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted)
    }
}

/// Shared property paths, one instance per dotted string.
///
/// Criteria and comparators built through the same registry share path
/// instances, and with them the per-type slot caches. A [`QueryEngine`]
/// owns one registry for its whole lifetime.
///
/// [`QueryEngine`]: crate::QueryEngine
#[derive(Default)]
pub struct PathRegistry {
    paths: RwLock<HashMap<String, Arc<PropertyPath>>>,
}

impl PathRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        PathRegistry::default()
    }

    /// Returns the shared path for `dotted`, parsing it on first use.
    pub fn path(&self, dotted: &str) -> Result<Arc<PropertyPath>> {
        let existing = self
            .paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(dotted)
            .cloned();
        if let Some(path) = existing {
            return Ok(path);
        }

        let path = Arc::new(PropertyPath::parse(dotted)?);
        let mut paths = self.paths.write().unwrap_or_else(PoisonError::into_inner);
        Ok(paths.entry(dotted.to_string()).or_insert(path).clone())
    }

    /// Number of distinct paths handed out so far.
    pub fn len(&self) -> usize {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no path has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PathRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRegistry")
            .field("paths", &self.len())
            .finish()
    }
}
