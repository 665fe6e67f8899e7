//! Query - ORM-agnostic query modifiers.
//!
//! This crate narrows, orders and pages queries for any backend without
//! knowing anything about it. The caller supplies small adapter functions
//! (how to build `email = ?`, how to AND two conditions, how to attach a
//! WHERE clause) and gets back a modified query value. It supports:
//!
//! - Structured filters: `{field, operator, value}` lists with AND/OR logic
//! - Typed field builders for strings, booleans and timestamps
//! - Free-text search across several fields
//! - ID lists, multi-field sorting, and limit/offset pagination
//!
//! # Quick Start
//!
//! ```rust
//! use standout_query::{
//!     atom, bool_field, evaluate, BoolPredicates, Combinators, FilterGroup, FilterRegistry,
//!     Operator,
//! };
//!
//! // Predicates are plain SQL fragments here; any type works.
//! let combinators = Combinators::new(
//!     |ps: Vec<String>| format!("({})", ps.join(" AND ")),
//!     |ps: Vec<String>| format!("({})", ps.join(" OR ")),
//! );
//!
//! let registry = FilterRegistry::build(
//!     &combinators,
//!     [bool_field(
//!         "archived",
//!         BoolPredicates {
//!             eq: atom(|b: bool| format!("archived = {b}")),
//!             ne: atom(|b: bool| format!("archived <> {b}")),
//!         },
//!     )],
//! );
//!
//! let group = FilterGroup::new()
//!     .filter("archived", Operator::Eq, false)
//!     .filter("unknown", Operator::Eq, "ignored");
//!
//! let predicate = evaluate(&group, &registry, &combinators).unwrap();
//! assert_eq!(predicate.as_deref(), Some("archived = false"));
//! ```
//!
//! # Evaluation Semantics
//!
//! ```text
//! group  = [f1, f2, ...] with logic L
//! result = none                 if no filter names a registered field
//!        = pred(fi)             if exactly one does
//!        = L(pred(f1), ...)     otherwise (L is AND unless the tag is "or")
//! ```
//!
//! Unknown fields are skipped and unknown operators act as `eq`, so clients
//! sending newer filters degrade gracefully. Values of the wrong type are
//! errors.
//!
//! # Field Types and Operators
//!
//! | Type | Meaningful operators | Degraded operators |
//! |------|----------------------|--------------------|
//! | String | all thirteen | none |
//! | Bool | `eq`, `ne`, `in`, `nin` | comparisons act as `eq`; string matching is always true |
//! | Time | comparisons, `in`, `nin`, null checks | string matching is always true |
//!
//! Null checks on non-nullable fields are answered with predicates that are
//! always false (`null`) or always true (`nnull`), built from the field's own
//! atoms and the [`Combinators`].

mod builders;
mod combinators;
mod config;
mod error;
mod op;
pub mod pagination;
mod registry;
mod search;
pub mod sort;
mod structured;
mod value;

// Re-export public API
pub use builders::{
    parse_time_value, zero_time, BoolFilter, BoolPredicates, FieldFilter, NullChecks,
    StringFilter, StringPredicates, TimeFilter, TimeParsing, TimePredicates,
};
pub use combinators::{atom, null_atom, set_atom, Atom, Combinators, NullAtom, SetAtom};
pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use op::Operator;
pub use pagination::Page;
pub use registry::{
    bool_field, nullable_string_field, nullable_time_field, strict_time_field, string_field,
    time_field, FieldSpec, FilterRegistry, SharedFieldFilter,
};
pub use search::{apply_ids, apply_search, apply_where, SearchFields};
pub use sort::{Criteria, OrderBuilder, SortFields, SortOrder};
pub use structured::{
    apply_structured_filters, build_predicate, evaluate, Filter, FilterGroup, Logic,
};
pub use value::{FilterValue, Number};
