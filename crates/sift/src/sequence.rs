//! Normalization of adapter scans into indexable sequences.
//!
//! Adapters hand back whatever shape their storage has: a borrowed slice, an
//! owned vector or a lazy iterator. The engine needs random access to sort,
//! so [`to_sequence`] turns any [`Scan`] into a slice, copying only when the
//! source is not already contiguous.

use std::borrow::Cow;
use std::fmt;

/// A full scan of one keyspace, as returned by an adapter.
pub enum Scan<'a, T> {
    /// Records borrowed from the adapter's storage.
    Slice(&'a [T]),
    /// Records the adapter materialized for this call.
    Vec(Vec<T>),
    /// Records produced lazily, in source order.
    Iter(Box<dyn Iterator<Item = T> + 'a>),
}

impl<'a, T> Scan<'a, T> {
    /// Wraps any iterator.
    pub fn iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Scan::Iter(Box::new(iter.into_iter()))
    }
}

impl<'a, T> From<&'a [T]> for Scan<'a, T> {
    fn from(records: &'a [T]) -> Self {
        Scan::Slice(records)
    }
}

impl<'a, T> From<&'a Vec<T>> for Scan<'a, T> {
    fn from(records: &'a Vec<T>) -> Self {
        Scan::Slice(records)
    }
}

impl<T> From<Vec<T>> for Scan<'_, T> {
    fn from(records: Vec<T>) -> Self {
        Scan::Vec(records)
    }
}

impl<T> fmt::Debug for Scan<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scan::Slice(records) => f.debug_tuple("Slice").field(&records.len()).finish(),
            Scan::Vec(records) => f.debug_tuple("Vec").field(&records.len()).finish(),
            Scan::Iter(_) => f.write_str("Iter(..)"),
        }
    }
}

/// Converts a scan into an indexable sequence, preserving source order.
///
/// Slices are borrowed without copying, vectors are taken as they are and
/// iterators are collected in a single pass. An absent scan is empty.
///
/// ```
/// use std::borrow::Cow;
/// use sift::{to_sequence, Scan};
///
/// let stored = vec![1, 2, 3];
/// assert!(matches!(to_sequence(Some(Scan::from(&stored))), Cow::Borrowed(_)));
/// assert_eq!(&*to_sequence(Some(Scan::iter(4..6))), &[4, 5]);
/// assert!(to_sequence::<u8>(None).is_empty());
/// ```
pub fn to_sequence<T: Clone>(scan: Option<Scan<'_, T>>) -> Cow<'_, [T]> {
    match scan {
        None => Cow::Owned(Vec::new()),
        Some(Scan::Slice(records)) => Cow::Borrowed(records),
        Some(Scan::Vec(records)) => Cow::Owned(records),
        Some(Scan::Iter(records)) => Cow::Owned(records.collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn slices_are_borrowed() {
        let stored = vec!["a".to_string(), "b".to_string()];
        let sequence = to_sequence(Some(Scan::from(stored.as_slice())));
        match sequence {
            Cow::Borrowed(records) => assert!(std::ptr::eq(records, stored.as_slice())),
            Cow::Owned(_) => panic!("slice scan was copied"),
        }
    }

    #[test]
    fn vectors_are_moved() {
        let sequence = to_sequence(Some(Scan::from(vec![3, 1, 2])));
        assert!(matches!(sequence, Cow::Owned(ref v) if v == &[3, 1, 2]));
    }

    #[test]
    fn iterators_keep_source_order() {
        let set: BTreeSet<_> = [5, 1, 3].into_iter().collect();
        let sequence = to_sequence(Some(Scan::iter(set)));
        assert_eq!(&*sequence, &[1, 3, 5]);
    }

    #[test]
    fn absent_is_empty() {
        assert!(to_sequence::<String>(None).is_empty());
        assert_eq!(format!("{:?}", Scan::<u8>::Vec(vec![1, 2])), "Vec(2)");
    }
}
