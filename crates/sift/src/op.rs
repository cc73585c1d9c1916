//! Comparison operators for leaf predicates.
//!
//! The [`Operator`] enum names every comparison a query-method parser can
//! produce. Most are evaluated by [`predicate::build`]; a handful only make
//! sense against an indexed or geo-aware store and are rejected at build
//! time.
//!
//! [`predicate::build`]: crate::predicate::build

use std::cmp::Ordering;

/// Comparison operator for a leaf predicate.
///
/// Operators are grouped by the values they apply to:
/// - **Universal**: `Equals`, `NotEquals`, `IsNull`, `IsNotNull`, `In`, `NotIn`
/// - **Boolean**: `IsTrue`, `IsFalse`
/// - **Ordering**: `GreaterThan`, `GreaterThanEqual`, `LessThan`,
///   `LessThanEqual`, `Between`
/// - **Ordering aliases**: `Before` (for `LessThan`), `After` (for `GreaterThan`)
/// - **String and collection**: `StartsWith`, `EndsWith`, `Contains`, `Like`,
///   `Matches`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Universal operators
    /// Null-safe structural equality.
    Equals,
    /// Negation of `Equals`.
    NotEquals,
    /// Value is null.
    IsNull,
    /// Value is not null.
    IsNotNull,

    // Boolean checks
    /// Value is `true`.
    IsTrue,
    /// Value is `false`.
    IsFalse,

    // Ordering operators
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessThanEqual,
    /// Strictly between two bounds.
    Between,
    /// Earlier than (alias for `LessThan`).
    Before,
    /// Later than (alias for `GreaterThan`).
    After,

    // String and collection operators
    /// String starts with prefix.
    StartsWith,
    /// String ends with suffix.
    EndsWith,
    /// Substring, element or map-value containment.
    Contains,
    /// Alias for `Contains`.
    Like,
    /// String matches a regular expression.
    Matches,
    /// Value is one of the given list.
    In,
    /// Value is none of the given list.
    NotIn,

    // Parsed but not evaluable in memory
    /// Negated `Like`.
    NotLike,
    /// Negated `Contains`.
    NotContaining,
    /// Attribute exists on the stored document.
    Exists,
    /// Collection is empty.
    IsEmpty,
    /// Collection is not empty.
    IsNotEmpty,
    /// Geo proximity.
    Near,
    /// Geo containment.
    Within,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 27] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::IsTrue,
        Operator::IsFalse,
        Operator::GreaterThan,
        Operator::GreaterThanEqual,
        Operator::LessThan,
        Operator::LessThanEqual,
        Operator::Between,
        Operator::Before,
        Operator::After,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Contains,
        Operator::Like,
        Operator::Matches,
        Operator::In,
        Operator::NotIn,
        Operator::NotLike,
        Operator::NotContaining,
        Operator::Exists,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
        Operator::Near,
        Operator::Within,
    ];

    /// Number of literal arguments this operator consumes.
    pub fn arity(self) -> usize {
        match self {
            Operator::IsNull
            | Operator::IsNotNull
            | Operator::IsTrue
            | Operator::IsFalse
            | Operator::Exists
            | Operator::IsEmpty
            | Operator::IsNotEmpty => 0,
            Operator::Between | Operator::Within => 2,
            _ => 1,
        }
    }

    /// Returns `true` if the in-memory engine can evaluate this operator.
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            Operator::NotLike
                | Operator::NotContaining
                | Operator::Exists
                | Operator::IsEmpty
                | Operator::IsNotEmpty
                | Operator::Near
                | Operator::Within
        )
    }

    /// Returns `true` if this operator compares by natural ordering.
    pub fn is_ordering(self) -> bool {
        matches!(
            self.normalize(),
            Operator::GreaterThan
                | Operator::GreaterThanEqual
                | Operator::LessThan
                | Operator::LessThanEqual
        )
    }

    /// Returns `true` if the ignore-case flag changes this operator.
    pub fn is_case_sensitive(self) -> bool {
        matches!(
            self.normalize(),
            Operator::Equals
                | Operator::NotEquals
                | Operator::StartsWith
                | Operator::EndsWith
                | Operator::Contains
                | Operator::Matches
        )
    }

    /// Normalizes aliases to their canonical form.
    ///
    /// - `Before` -> `LessThan`
    /// - `After` -> `GreaterThan`
    /// - `Like` -> `Contains`
    /// - Others unchanged
    pub fn normalize(self) -> Operator {
        match self {
            Operator::Before => Operator::LessThan,
            Operator::After => Operator::GreaterThan,
            Operator::Like => Operator::Contains,
            other => other,
        }
    }

    /// Evaluates an ordering operator given `value.cmp(argument)`.
    ///
    /// Non-ordering operators evaluate to `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self.normalize() {
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanEqual => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::IsTrue => "is_true",
            Operator::IsFalse => "is_false",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanEqual => "greater_than_equal",
            Operator::LessThan => "less_than",
            Operator::LessThanEqual => "less_than_equal",
            Operator::Between => "between",
            Operator::Before => "before",
            Operator::After => "after",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::Contains => "contains",
            Operator::Like => "like",
            Operator::Matches => "matches",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::NotLike => "not_like",
            Operator::NotContaining => "not_containing",
            Operator::Exists => "exists",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::Near => "near",
            Operator::Within => "within",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
