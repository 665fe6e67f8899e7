//! Typed field filter builders.
//!
//! A [`FieldFilter`] turns one operator and value into one backend predicate
//! for a single field. Three builders ship with the crate:
//!
//! | Builder | Native type | Non-meaningful operators |
//! |---------|-------------|--------------------------|
//! | [`StringFilter`] | `String` | none |
//! | [`BoolFilter`] | `bool` | comparisons act as `eq`; string matching is always true |
//! | [`TimeFilter`] | `DateTime<Utc>` | string matching is always true |
//!
//! Where a field cannot express an operator natively (null checks on a
//! non-nullable column, `in []` on a boolean), the builder synthesizes an
//! always-true or always-false predicate from the field's own atoms and the
//! injected [`Combinators`](crate::Combinators), e.g. `or(x = s, x != s)`.

mod boolean;
mod string;
mod time;

pub use boolean::{BoolFilter, BoolPredicates};
pub use string::{StringFilter, StringPredicates};
pub use time::{parse_time_value, zero_time, TimeFilter, TimeParsing, TimePredicates};

use std::fmt;

use crate::combinators::NullAtom;
use crate::error::Result;
use crate::value::FilterValue;

/// Builds predicates for one field across the thirteen filter operators.
///
/// Value-taking methods fail with
/// [`QueryError::TypeMismatch`](crate::QueryError::TypeMismatch) when the
/// value does not fit the field's native type. String matching and null
/// checks always produce a predicate.
///
/// Implementations are immutable once built and are shared read-only
/// between evaluations.
pub trait FieldFilter<P>: Send + Sync {
    /// Field equals the value.
    fn eq(&self, value: &FilterValue) -> Result<P>;

    /// Field differs from the value.
    fn ne(&self, value: &FilterValue) -> Result<P>;

    /// Field is greater than the value.
    fn gt(&self, value: &FilterValue) -> Result<P>;

    /// Field is greater than or equal to the value.
    fn gte(&self, value: &FilterValue) -> Result<P>;

    /// Field is less than the value.
    fn lt(&self, value: &FilterValue) -> Result<P>;

    /// Field is less than or equal to the value.
    fn lte(&self, value: &FilterValue) -> Result<P>;

    /// Field is one of the values.
    fn is_in(&self, values: &[FilterValue]) -> Result<P>;

    /// Field is none of the values.
    fn not_in(&self, values: &[FilterValue]) -> Result<P>;

    /// Field contains the substring.
    fn contains(&self, value: &str) -> P;

    /// Field starts with the prefix.
    fn starts_with(&self, value: &str) -> P;

    /// Field ends with the suffix.
    fn ends_with(&self, value: &str) -> P;

    /// Field is null.
    fn is_null(&self) -> P;

    /// Field is not null.
    fn is_not_null(&self) -> P;
}

/// Nil-check atoms for a nullable field.
///
/// A builder constructed with `NullChecks` is nullable and delegates
/// `is_null` / `is_not_null` to them; without, the field is treated as
/// never null.
pub struct NullChecks<P> {
    /// Predicate matching rows where the field is null.
    pub is_nil: NullAtom<P>,
    /// Predicate matching rows where the field is not null.
    pub is_not_nil: NullAtom<P>,
}

impl<P> Clone for NullChecks<P> {
    fn clone(&self) -> Self {
        NullChecks {
            is_nil: self.is_nil.clone(),
            is_not_nil: self.is_not_nil.clone(),
        }
    }
}

impl<P> fmt::Debug for NullChecks<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullChecks").finish_non_exhaustive()
    }
}
