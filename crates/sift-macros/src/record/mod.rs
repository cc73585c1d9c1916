//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module generates `sift::Record` and `sift::AsValue` implementations
//! and attribute name constants from struct fields.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
