//! Proc macros for query-filter.
//!
//! # Derive Macros
//!
//! - [`Queryable`] - Expose struct fields as attributes to query paths
//!
//! The derive is re-exported by `query_filter` behind its default `derive`
//! feature; depend on this crate directly only when that feature is off.
//! Generated code refers to `::query_filter`, so that crate must be a
//! dependency of the deriving crate.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod queryable;

/// Derives the `Queryable` trait for structs with named fields.
///
/// This macro generates:
///
/// 1. `Queryable::to_value()` returning the struct as an object node
/// 2. `Queryable::attr()` resolving each field by name
/// 3. A `SCREAMING_SNAKE_CASE` constant per field holding its attribute name
///
/// Every exposed field must itself implement `Queryable`.
///
/// # Field Attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `#[query(skip)]` | Field is not reachable by attribute lookups |
/// | `#[query(rename = "name")]` | Field is looked up as `name` |
///
/// # Example
///
/// ```ignore
/// use query_filter::{filter_all, query, Queryable};
///
/// #[derive(Clone, Queryable)]
/// struct Person {
///     name: String,
///     #[query(rename = "mum")]
///     mother: Option<Box<Person>>,
///     #[query(skip)]
///     password_hash: String,
/// }
///
/// let people: Vec<Person> = load_people();
/// let children_of_mary = query().attr(Person::MUM).attr(Person::NAME).eq("Mary");
/// let found = filter_all(&people, [children_of_mary]);
/// ```
#[proc_macro_derive(Queryable, attributes(query))]
pub fn queryable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    queryable::queryable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
