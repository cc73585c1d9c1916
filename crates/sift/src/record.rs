//! The record capability the engine reads attributes through.
//!
//! A [`Record`] exposes its attribute names in a fixed slot order and the
//! value stored in each slot. Property paths resolve a name to a slot once
//! per record type and then read by slot, so a scan over many records of
//! the same type never repeats the name lookup.
//!
//! [`AsValue`] converts field types into [`Value`]s. It is what the
//! `#[derive(Record)]` macro calls for every field.

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::SystemTime;

use crate::value::{Number, Timestamp, Value};

/// A value the query engine can read attributes from.
///
/// This trait is typically derived using `#[derive(Record)]`, but can also
/// be implemented manually.
///
/// # Derive Usage
///
/// ```ignore
/// use sift::Record;
///
/// #[derive(Record)]
/// struct Person {
///     name: Option<String>,
///     age: u32,
///     address: Option<Address>,
/// }
///
/// #[derive(Record)]
/// struct Address {
///     city: String,
/// }
/// ```
///
/// # Manual Implementation
///
/// ```
/// use sift::{AsValue, Record, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Record for Task {
///     fn attributes(&self) -> &'static [&'static str] {
///         &["name", "priority"]
///     }
///
///     fn attribute(&self, slot: usize) -> Value<'_> {
///         match slot {
///             0 => self.name.as_value(),
///             1 => self.priority.as_value(),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// let task = Task { name: "docs".into(), priority: 3 };
/// assert_eq!(task.get("name"), Some(Value::String("docs")));
/// assert_eq!(task.get("missing"), None);
/// ```
pub trait Record: 'static {
    /// Attribute names in slot order.
    ///
    /// Must return the same list for every instance of a type.
    fn attributes(&self) -> &'static [&'static str];

    /// Returns the value stored in `slot`.
    ///
    /// Slots outside `attributes()` read as [`Value::Null`].
    fn attribute(&self, slot: usize) -> Value<'_>;

    /// Key identifying the concrete record type.
    fn record_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Type name used in diagnostics.
    fn record_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the slot of the named attribute.
    fn slot_of(&self, name: &str) -> Option<usize> {
        self.attributes().iter().position(|attr| *attr == name)
    }

    /// Reads an attribute by name; `None` if the type has no such attribute.
    fn get(&self, name: &str) -> Option<Value<'_>> {
        self.slot_of(name).map(|slot| self.attribute(slot))
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn attributes(&self) -> &'static [&'static str] {
        (**self).attributes()
    }

    fn attribute(&self, slot: usize) -> Value<'_> {
        (**self).attribute(slot)
    }

    fn record_type(&self) -> TypeId {
        (**self).record_type()
    }

    fn record_name(&self) -> &'static str {
        (**self).record_name()
    }
}

impl<R: Record + ?Sized> Record for Arc<R> {
    fn attributes(&self) -> &'static [&'static str] {
        (**self).attributes()
    }

    fn attribute(&self, slot: usize) -> Value<'_> {
        (**self).attribute(slot)
    }

    fn record_type(&self) -> TypeId {
        (**self).record_type()
    }

    fn record_name(&self) -> &'static str {
        (**self).record_name()
    }
}

impl<R: Record + ?Sized> Record for Rc<R> {
    fn attributes(&self) -> &'static [&'static str] {
        (**self).attributes()
    }

    fn attribute(&self, slot: usize) -> Value<'_> {
        (**self).attribute(slot)
    }

    fn record_type(&self) -> TypeId {
        (**self).record_type()
    }

    fn record_name(&self) -> &'static str {
        (**self).record_name()
    }
}

/// Conversion of a field into a borrowed [`Value`].
///
/// Implemented for the standard scalar, string, optional, collection and
/// map types. `#[derive(Record)]` also implements it for the deriving
/// struct, so records nest inside records, options and collections.
pub trait AsValue {
    /// Borrows `self` as a value.
    fn as_value(&self) -> Value<'_>;
}

impl AsValue for str {
    fn as_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsValue for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! numeric_as_value {
    ($($ty:ty),*) => {
        $(
            impl AsValue for $ty {
                fn as_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

numeric_as_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl AsValue for Number {
    fn as_value(&self) -> Value<'_> {
        Value::Number(*self)
    }
}

impl AsValue for Timestamp {
    fn as_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl AsValue for SystemTime {
    fn as_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl<T: AsValue + ?Sized> AsValue for &T {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Box<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Arc<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.as_value(),
            None => Value::Null,
        }
    }
}

impl<T: AsValue> AsValue for [T] {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue, const N: usize> AsValue for [T; N] {
    fn as_value(&self) -> Value<'_> {
        self.as_slice().as_value()
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(&self) -> Value<'_> {
        self.as_slice().as_value()
    }
}

impl<T: AsValue> AsValue for VecDeque<T> {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue, S> AsValue for HashSet<T, S> {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue> AsValue for BTreeSet<T> {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<K: AsValue, V: AsValue, S> AsValue for HashMap<K, V, S> {
    fn as_value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.as_value(), v.as_value()))
                .collect(),
        )
    }
}

impl<K: AsValue, V: AsValue> AsValue for BTreeMap<K, V> {
    fn as_value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.as_value(), v.as_value()))
                .collect(),
        )
    }
}
