//! Leaf predicates: one operator applied to one property path.
//!
//! [`build`] turns `(path, operator, ignore_case, args)` into a [`Criteria`]
//! tree. Most operators produce a single leaf; `Between` produces two leaves
//! over the same path, joined with AND.
//!
//! Every configuration mistake (unsupported operator, missing argument,
//! invalid regex) is reported here, at build time. Evaluation only fails
//! for path errors and for ordering values that cannot be compared.

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::criteria::Criteria;
use crate::error::{QueryError, Result};
use crate::literal::Literal;
use crate::op::Operator;
use crate::ordering::compare_values;
use crate::path::PropertyPath;
use crate::record::Record;
use crate::value::Value;

type Test = Arc<dyn Fn(Option<&Value<'_>>) -> Result<bool> + Send + Sync>;

/// A single operator test against one property.
///
/// The resolved attribute is handed to the test as `None` when the path
/// yields null at any segment.
#[derive(Clone)]
pub struct Predicate {
    path: Arc<PropertyPath>,
    operator: Operator,
    ignore_case: bool,
    args: Vec<Literal>,
    test: Test,
}

impl Predicate {
    /// The property this predicate reads.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// The operator, as supplied (aliases are not normalized).
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Whether string comparisons ignore case.
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// The arguments this leaf consumed.
    pub fn args(&self) -> &[Literal] {
        &self.args
    }

    /// Resolves the path against `record` and applies the test.
    pub fn test(&self, record: &dyn Record) -> Result<bool> {
        let value = self.path.resolve(record)?;
        (self.test)(value.as_ref())
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("path", &self.path.as_str())
            .field("operator", &self.operator)
            .field("ignore_case", &self.ignore_case)
            .field("args", &self.args)
            .finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.operator)?;
        for arg in &self.args {
            match arg {
                Literal::String(s) => write!(f, " {s:?}")?,
                Literal::Regex(r) => write!(f, " /{}/", r.as_str())?,
                other => write!(f, " {}", other.as_value())?,
            }
        }
        if self.ignore_case && self.operator.is_case_sensitive() {
            f.write_str(" (ignore case)")?;
        }
        Ok(())
    }
}

/// Builds the criteria for one operator over `path`.
///
/// `args` must hold at least `operator.arity()` literals; any beyond that
/// are ignored.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sift::{predicate, Literal, Operator, PropertyPath};
///
/// let path = Arc::new(PropertyPath::parse("age").unwrap());
/// let adults = predicate::build(path, Operator::GreaterThanEqual, false, &[Literal::from(18)])
///     .unwrap();
/// assert_eq!(adults.to_string(), "age greater_than_equal 18");
/// ```
pub fn build(
    path: Arc<PropertyPath>,
    operator: Operator,
    ignore_case: bool,
    args: &[Literal],
) -> Result<Criteria> {
    if !operator.is_supported() {
        return Err(QueryError::UnsupportedOperator {
            operator: operator.as_str(),
        });
    }

    let arity = operator.arity();
    if args.len() < arity {
        return Err(QueryError::MissingArgument {
            operator: operator.as_str(),
            expected: arity,
            supplied: args.len(),
        });
    }
    let args = &args[..arity];

    let leaf = |check: Test| {
        Criteria::Leaf(Predicate {
            path: path.clone(),
            operator,
            ignore_case,
            args: args.to_vec(),
            test: check,
        })
    };

    Ok(match operator.normalize() {
        Operator::IsNull => leaf(test(|value| Ok(value.is_none()))),
        Operator::IsNotNull => leaf(test(|value| Ok(value.is_some()))),
        Operator::IsTrue => leaf(test(|value| Ok(matches!(value, Some(Value::Bool(true)))))),
        Operator::IsFalse => leaf(test(|value| Ok(matches!(value, Some(Value::Bool(false)))))),

        Operator::Equals => {
            let expected = args[0].clone();
            leaf(test(move |value| {
                Ok(equals(value, &expected.as_value(), ignore_case))
            }))
        }
        Operator::NotEquals => {
            let expected = args[0].clone();
            leaf(test(move |value| {
                Ok(!equals(value, &expected.as_value(), ignore_case))
            }))
        }

        Operator::GreaterThan
        | Operator::GreaterThanEqual
        | Operator::LessThan
        | Operator::LessThanEqual => leaf(ordering_test(operator, args[0].clone())),

        Operator::Between => {
            let low = Criteria::Leaf(Predicate {
                path: path.clone(),
                operator: Operator::GreaterThan,
                ignore_case,
                args: vec![args[0].clone()],
                test: ordering_test(Operator::GreaterThan, args[0].clone()),
            });
            let high = Criteria::Leaf(Predicate {
                path: path.clone(),
                operator: Operator::LessThan,
                ignore_case,
                args: vec![args[1].clone()],
                test: ordering_test(Operator::LessThan, args[1].clone()),
            });
            low.and(high)
        }

        Operator::StartsWith => leaf(affix_test(&args[0], ignore_case, |s, affix| {
            s.starts_with(affix)
        })),
        Operator::EndsWith => leaf(affix_test(&args[0], ignore_case, |s, affix| {
            s.ends_with(affix)
        })),

        Operator::Contains => {
            let needle = args[0].clone();
            leaf(test(move |value| {
                Ok(contains(value, &needle.as_value(), ignore_case))
            }))
        }

        Operator::Matches => leaf(matches_test(&args[0], ignore_case)?),

        Operator::In | Operator::NotIn => {
            let negate = operator == Operator::NotIn;
            match args[0].as_list() {
                Some(items) => {
                    let items = items.to_vec();
                    leaf(test(move |value| {
                        let found = items
                            .iter()
                            .any(|item| equals(value, &item.as_value(), false));
                        Ok(found != negate)
                    }))
                }
                None => leaf(test(|_| Ok(false))),
            }
        }

        // Aliases and unsupported operators are handled above
        other => {
            return Err(QueryError::UnsupportedOperator {
                operator: other.as_str(),
            })
        }
    })
}

/// Boxes a test closure, pinning its higher-ranked signature.
fn test<F>(f: F) -> Test
where
    F: Fn(Option<&Value<'_>>) -> Result<bool> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Null-safe equality; ignore-case only applies when both sides are strings.
fn equals(value: Option<&Value<'_>>, expected: &Value<'_>, ignore_case: bool) -> bool {
    match value {
        None => expected.is_null(),
        Some(value) => element_equals(value, expected, ignore_case),
    }
}

fn element_equals(value: &Value<'_>, expected: &Value<'_>, ignore_case: bool) -> bool {
    match (value, expected) {
        (Value::String(a), Value::String(b)) if ignore_case => {
            a.to_lowercase() == b.to_lowercase()
        }
        _ => value == expected,
    }
}

/// Ordering comparison with a null-high argument.
///
/// A null attribute never satisfies the comparison.
fn ordering_test(operator: Operator, argument: Literal) -> Test {
    test(move |value| {
        let Some(value) = value else {
            return Ok(false);
        };
        let ordering = if argument.is_null() {
            std::cmp::Ordering::Less
        } else {
            compare_values(value, &argument.as_value())?
        };
        Ok(operator.eval_ordering(ordering))
    })
}

/// Prefix/suffix test; false unless both sides are strings.
fn affix_test(argument: &Literal, ignore_case: bool, check: fn(&str, &str) -> bool) -> Test {
    let Some(affix) = argument.as_str() else {
        return test(|_| Ok(false));
    };
    let affix = if ignore_case {
        affix.to_lowercase()
    } else {
        affix.to_string()
    };

    test(move |value| {
        Ok(match value {
            Some(Value::String(s)) if ignore_case => check(&s.to_lowercase(), &affix),
            Some(Value::String(s)) => check(s, &affix),
            _ => false,
        })
    })
}

/// Generalized containment.
///
/// Lists test their elements, maps their values, strings their substrings
/// and anything else non-null its string form.
fn contains(value: Option<&Value<'_>>, needle: &Value<'_>, ignore_case: bool) -> bool {
    match value {
        None => false,
        Some(Value::List(items)) => items
            .iter()
            .any(|item| element_equals(item, needle, ignore_case)),
        Some(Value::Map(entries)) => entries
            .iter()
            .any(|(_, item)| element_equals(item, needle, ignore_case)),
        Some(Value::String(s)) => substring(s, needle, ignore_case),
        Some(other) => substring(&other.to_string(), needle, ignore_case),
    }
}

fn substring(haystack: &str, needle: &Value<'_>, ignore_case: bool) -> bool {
    if needle.is_null() {
        return false;
    }
    let needle = needle.to_string();
    if ignore_case {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    } else {
        haystack.contains(&needle)
    }
}

/// Regex match.
///
/// A null argument matches only null values. A compiled [`Regex`] searches
/// anywhere in the string; any other argument is coerced to a pattern that
/// must match the whole string.
fn matches_test(argument: &Literal, ignore_case: bool) -> Result<Test> {
    let regex = match argument {
        Literal::Null => return Ok(test(|value| Ok(value.is_none()))),
        Literal::Regex(regex) if !ignore_case => regex.clone(),
        Literal::Regex(regex) => RegexBuilder::new(regex.as_str())
            .case_insensitive(true)
            .build()?,
        other => RegexBuilder::new(&format!("^(?:{})$", other.as_value()))
            .case_insensitive(ignore_case)
            .build()?,
    };

    Ok(regex_test(regex))
}

fn regex_test(regex: Regex) -> Test {
    test(move |value| Ok(matches!(value, Some(Value::String(s)) if regex.is_match(s))))
}
