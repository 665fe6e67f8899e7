use std::fmt;

use crate::builders::{FieldFilter, NullChecks};
use crate::combinators::{Atom, Combinators, SetAtom};
use crate::error::{QueryError, Result};
use crate::value::FilterValue;

/// Value every row either equals or differs from.
const SENTINEL: &str = "";

/// Atoms for filtering a string field.
///
/// These usually come straight from the backend's generated helpers, e.g.
/// `email_eq`, `email_contains_fold`. Whether `contains` and friends are
/// case-insensitive is up to these functions.
pub struct StringPredicates<P> {
    pub eq: Atom<String, P>,
    pub ne: Atom<String, P>,
    pub gt: Atom<String, P>,
    pub gte: Atom<String, P>,
    pub lt: Atom<String, P>,
    pub lte: Atom<String, P>,
    pub is_in: SetAtom<String, P>,
    pub not_in: SetAtom<String, P>,
    pub contains: Atom<String, P>,
    pub starts_with: Atom<String, P>,
    pub ends_with: Atom<String, P>,
}

impl<P> Clone for StringPredicates<P> {
    fn clone(&self) -> Self {
        StringPredicates {
            eq: self.eq.clone(),
            ne: self.ne.clone(),
            gt: self.gt.clone(),
            gte: self.gte.clone(),
            lt: self.lt.clone(),
            lte: self.lte.clone(),
            is_in: self.is_in.clone(),
            not_in: self.not_in.clone(),
            contains: self.contains.clone(),
            starts_with: self.starts_with.clone(),
            ends_with: self.ends_with.clone(),
        }
    }
}

/// [`FieldFilter`] for string fields.
///
/// Values must already be strings; nothing is stringified on the way in.
/// Non-nullable fields answer null checks with `and(eq(""), ne(""))` and
/// `or(eq(""), ne(""))`.
pub struct StringFilter<P> {
    field: String,
    predicates: StringPredicates<P>,
    combinators: Combinators<P>,
    nulls: Option<NullChecks<P>>,
}

impl<P> StringFilter<P> {
    /// Creates a builder for a non-nullable string field.
    pub fn new(
        field: impl Into<String>,
        predicates: StringPredicates<P>,
        combinators: Combinators<P>,
    ) -> Self {
        StringFilter {
            field: field.into(),
            predicates,
            combinators,
            nulls: None,
        }
    }

    /// Makes the field nullable, delegating null checks to `nulls`.
    pub fn nullable(mut self, nulls: NullChecks<P>) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// Returns the field name this builder was created for.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns `true` if the field can hold null.
    pub fn is_nullable(&self) -> bool {
        self.nulls.is_some()
    }

    fn coerce(&self, value: &FilterValue) -> Result<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| QueryError::type_mismatch(&self.field, "string", value.type_name()))
    }

    fn coerce_all(&self, values: &[FilterValue]) -> Result<Vec<String>> {
        values.iter().map(|v| self.coerce(v)).collect()
    }

    fn sentinel_pair(&self) -> Vec<P> {
        vec![
            (self.predicates.eq)(SENTINEL.to_string()),
            (self.predicates.ne)(SENTINEL.to_string()),
        ]
    }
}

impl<P> FieldFilter<P> for StringFilter<P> {
    fn eq(&self, value: &FilterValue) -> Result<P> {
        Ok((self.predicates.eq)(self.coerce(value)?))
    }

    fn ne(&self, value: &FilterValue) -> Result<P> {
        Ok((self.predicates.ne)(self.coerce(value)?))
    }

    fn gt(&self, value: &FilterValue) -> Result<P> {
        Ok((self.predicates.gt)(self.coerce(value)?))
    }

    fn gte(&self, value: &FilterValue) -> Result<P> {
        Ok((self.predicates.gte)(self.coerce(value)?))
    }

    fn lt(&self, value: &FilterValue) -> Result<P> {
        Ok((self.predicates.lt)(self.coerce(value)?))
    }

    fn lte(&self, value: &FilterValue) -> Result<P> {
        Ok((self.predicates.lte)(self.coerce(value)?))
    }

    fn is_in(&self, values: &[FilterValue]) -> Result<P> {
        Ok((self.predicates.is_in)(self.coerce_all(values)?))
    }

    fn not_in(&self, values: &[FilterValue]) -> Result<P> {
        Ok((self.predicates.not_in)(self.coerce_all(values)?))
    }

    fn contains(&self, value: &str) -> P {
        (self.predicates.contains)(value.to_string())
    }

    fn starts_with(&self, value: &str) -> P {
        (self.predicates.starts_with)(value.to_string())
    }

    fn ends_with(&self, value: &str) -> P {
        (self.predicates.ends_with)(value.to_string())
    }

    fn is_null(&self) -> P {
        match &self.nulls {
            Some(nulls) => (nulls.is_nil)(),
            // No value can equal and differ from the sentinel at once.
            None => self.combinators.and(self.sentinel_pair()),
        }
    }

    fn is_not_null(&self) -> P {
        match &self.nulls {
            Some(nulls) => (nulls.is_not_nil)(),
            // Every value equals or differs from the sentinel.
            None => self.combinators.or(self.sentinel_pair()),
        }
    }
}

impl<P> fmt::Debug for StringFilter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringFilter")
            .field("field", &self.field)
            .field("nullable", &self.is_nullable())
            .finish_non_exhaustive()
    }
}
