//! Owned argument values for leaf predicates.
//!
//! Unlike [`Value`], which borrows from the record being tested, a
//! [`Literal`] owns its data so it can live inside a built criteria tree.

use std::time::SystemTime;

use regex::Regex;

use crate::value::{Number, Timestamp, Value};

/// Owned argument supplied to an operator.
///
/// # Example
///
/// ```
/// use sift::Literal;
///
/// let names: Literal = vec!["bob", "mike"].into();
/// assert!(names.as_list().is_some());
///
/// let missing: Literal = Option::<u32>::None.into();
/// assert!(missing.is_null());
/// ```
#[derive(Debug, Clone)]
pub enum Literal {
    /// Null argument.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// String value.
    String(String),
    /// Collection argument (for `In`, `NotIn`).
    List(Vec<Literal>),
    /// Compiled regular expression (for `Matches`).
    Regex(Regex),
}

impl Literal {
    /// Borrows this literal as a [`Value`] for comparison.
    ///
    /// A regex is viewed as its pattern string.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::Timestamp(t) => Value::Timestamp(*t),
            Literal::String(s) => Value::String(s),
            Literal::List(items) => Value::List(items.iter().map(Literal::as_value).collect()),
            Literal::Regex(r) => Value::String(r.as_str()),
        }
    }

    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the list elements, if present.
    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) => Some(items),
            _ => None,
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::Regex(a), Literal::Regex(b)) => a.as_str() == b.as_str(),
            (Literal::Regex(_), _) | (_, Literal::Regex(_)) => false,
            _ => self.as_value() == other.as_value(),
        }
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<Number> for Literal {
    fn from(n: Number) -> Self {
        Literal::Number(n)
    }
}

impl From<Timestamp> for Literal {
    fn from(t: Timestamp) -> Self {
        Literal::Timestamp(t)
    }
}

impl From<SystemTime> for Literal {
    fn from(t: SystemTime) -> Self {
        Literal::Timestamp(Timestamp::from(t))
    }
}

impl From<Regex> for Literal {
    fn from(r: Regex) -> Self {
        Literal::Regex(r)
    }
}

macro_rules! numeric_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                fn from(n: $ty) -> Self {
                    Literal::Number(Number::from(n))
                }
            }
        )*
    };
}

numeric_literal!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Literal::Null, Into::into)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(values: Vec<T>) -> Self {
        Literal::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Literal>, const N: usize> From<[T; N]> for Literal {
    fn from(values: [T; N]) -> Self {
        Literal::List(values.into_iter().map(Into::into).collect())
    }
}
