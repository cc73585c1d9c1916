//! Error types for the sift crate.

use thiserror::Error;

/// Errors that can occur when building or executing queries.
///
/// Every variant is fatal for the call that produced it: nothing in the
/// engine performs I/O, so there is nothing to retry.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A property path is empty or contains an empty segment.
    #[error("invalid property path '{path}'")]
    InvalidPath { path: String },

    /// A path segment names an attribute the record type does not have.
    #[error("no attribute '{attribute}' on record type {record}")]
    UnknownAttribute {
        attribute: String,
        record: &'static str,
    },

    /// A path tried to descend into a value that is not a record.
    #[error("cannot resolve '{attribute}' on a {found} value")]
    NotARecord {
        attribute: String,
        found: &'static str,
    },

    /// The operator exists in the query vocabulary but cannot be evaluated.
    #[error("operator '{operator}' is not supported by the in-memory engine")]
    UnsupportedOperator { operator: &'static str },

    /// Not enough arguments were supplied for an operator.
    #[error("operator '{operator}' expects {expected} argument(s), {supplied} left")]
    MissingArgument {
        operator: &'static str,
        expected: usize,
        supplied: usize,
    },

    /// Two non-null values have no natural ordering between them.
    #[error("cannot order {left} against {right}")]
    Incomparable {
        left: &'static str,
        right: &'static str,
    },

    /// The engine was used before a backing adapter was attached.
    #[error("no key/value adapter attached to the query engine")]
    AdapterNotAttached,

    /// A second adapter was attached to an engine that already has one.
    #[error("query engine already has a key/value adapter attached")]
    AdapterAlreadyAttached,
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = QueryError::UnknownAttribute {
            attribute: "nmae".to_string(),
            record: "Person",
        };
        assert_eq!(err.to_string(), "no attribute 'nmae' on record type Person");

        let err = QueryError::Incomparable {
            left: "string",
            right: "number",
        };
        assert_eq!(err.to_string(), "cannot order string against number");
    }

    #[test]
    fn regex_errors_convert() {
        let err: QueryError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, QueryError::InvalidRegex(_)));
        assert!(err.to_string().starts_with("invalid regex pattern"));
    }
}
