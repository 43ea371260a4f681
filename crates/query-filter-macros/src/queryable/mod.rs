//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! This module provides derive macro support for query-filter, generating
//! attribute lookups and field name constants from struct definitions.

mod attrs;
mod derive;

pub use derive::queryable_derive_impl;
