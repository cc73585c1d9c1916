//! Proc macros for sift.
//!
//! # Available Macros
//!
//! - [`Record`] - Implement `sift::Record` and `sift::AsValue` for a struct
//!   with named fields
//!
//! # Examples
//!
//! For working examples, see `sift/tests/record_derive.rs`.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` capability for query-enabled structs.
///
/// Every named field becomes an attribute, in declaration order, unless it
/// is skipped. Field types must implement `sift::AsValue`; that covers
/// strings, numbers, booleans, `Timestamp`, `SystemTime`, options, common
/// collections and maps, and any other struct deriving `Record`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[record(skip)]` | Exclude this field from queries |
/// | `#[record(rename = "...")]` | Use a custom attribute name in property paths |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Attribute name constants (e.g., `Person::FIRSTNAME`, `Person::ADDRESS`)
/// 2. An implementation of `sift::Record`
/// 3. An implementation of `sift::AsValue` yielding `Value::Record(self)`, so
///    the struct can be nested inside other records
///
/// # Example
///
/// ```ignore
/// use sift::{Query, Record};
///
/// #[derive(Record, Clone)]
/// struct Address {
///     city: String,
/// }
///
/// #[derive(Record, Clone)]
/// struct Person {
///     firstname: Option<String>,
///     address: Option<Address>,
///
///     #[record(rename = "years")]
///     age: u32,
///
///     #[record(skip)]
///     password_hash: String,
/// }
///
/// let people = vec![/* ... */];
/// let query = Query::new().order_asc("address.city").build();
/// let sorted = query.filter(&people).unwrap();
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
