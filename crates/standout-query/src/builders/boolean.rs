use std::fmt;

use crate::builders::FieldFilter;
use crate::combinators::{Atom, Combinators};
use crate::error::{QueryError, Result};
use crate::value::FilterValue;

/// Atoms for filtering a boolean field.
pub struct BoolPredicates<P> {
    pub eq: Atom<bool, P>,
    pub ne: Atom<bool, P>,
}

impl<P> Clone for BoolPredicates<P> {
    fn clone(&self) -> Self {
        BoolPredicates {
            eq: self.eq.clone(),
            ne: self.ne.clone(),
        }
    }
}

/// [`FieldFilter`] for boolean fields.
///
/// Only `eq` and `ne` mean anything for a boolean. The rest degrade without
/// failing:
///
/// - `gt`, `gte`, `lt`, `lte` behave as `eq`
/// - `contains`, `starts_with`, `ends_with` are always true
/// - `is_in` / `not_in` reduce to `eq(true)`, `eq(false)`, or an always-true
///   or always-false predicate depending on which values are listed
/// - the field is never null
pub struct BoolFilter<P> {
    field: String,
    predicates: BoolPredicates<P>,
    combinators: Combinators<P>,
}

/// Which boolean values a set mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Presence {
    has_true: bool,
    has_false: bool,
}

impl<P> BoolFilter<P> {
    /// Creates a builder for a boolean field.
    pub fn new(
        field: impl Into<String>,
        predicates: BoolPredicates<P>,
        combinators: Combinators<P>,
    ) -> Self {
        BoolFilter {
            field: field.into(),
            predicates,
            combinators,
        }
    }

    /// Returns the field name this builder was created for.
    pub fn field(&self) -> &str {
        &self.field
    }

    fn coerce(&self, value: &FilterValue) -> Result<bool> {
        value
            .as_bool()
            .ok_or_else(|| QueryError::type_mismatch(&self.field, "bool", value.type_name()))
    }

    fn presence(&self, values: &[FilterValue]) -> Result<Presence> {
        values.iter().try_fold(Presence::default(), |acc, v| {
            Ok(if self.coerce(v)? {
                Presence { has_true: true, ..acc }
            } else {
                Presence { has_false: true, ..acc }
            })
        })
    }

    fn both(&self) -> Vec<P> {
        vec![(self.predicates.eq)(true), (self.predicates.eq)(false)]
    }

    /// `eq(true) OR eq(false)`: every row.
    fn tautology(&self) -> P {
        self.combinators.or(self.both())
    }

    /// `eq(true) AND eq(false)`: no row.
    fn contradiction(&self) -> P {
        self.combinators.and(self.both())
    }
}

impl<P> FieldFilter<P> for BoolFilter<P> {
    fn eq(&self, value: &FilterValue) -> Result<P> {
        Ok((self.predicates.eq)(self.coerce(value)?))
    }

    fn ne(&self, value: &FilterValue) -> Result<P> {
        Ok((self.predicates.ne)(self.coerce(value)?))
    }

    fn gt(&self, value: &FilterValue) -> Result<P> {
        self.eq(value)
    }

    fn gte(&self, value: &FilterValue) -> Result<P> {
        self.eq(value)
    }

    fn lt(&self, value: &FilterValue) -> Result<P> {
        self.eq(value)
    }

    fn lte(&self, value: &FilterValue) -> Result<P> {
        self.eq(value)
    }

    fn is_in(&self, values: &[FilterValue]) -> Result<P> {
        let presence = self.presence(values)?;
        Ok(match (presence.has_true, presence.has_false) {
            (true, true) => self.tautology(),
            (true, false) => (self.predicates.eq)(true),
            (false, true) => (self.predicates.eq)(false),
            (false, false) => self.contradiction(),
        })
    }

    fn not_in(&self, values: &[FilterValue]) -> Result<P> {
        let presence = self.presence(values)?;
        Ok(match (presence.has_true, presence.has_false) {
            (true, true) => self.contradiction(),
            (true, false) => (self.predicates.eq)(false),
            (false, true) => (self.predicates.eq)(true),
            // Excluding nothing keeps everything.
            (false, false) => self.tautology(),
        })
    }

    fn contains(&self, _value: &str) -> P {
        self.tautology()
    }

    fn starts_with(&self, _value: &str) -> P {
        self.tautology()
    }

    fn ends_with(&self, _value: &str) -> P {
        self.tautology()
    }

    fn is_null(&self) -> P {
        self.contradiction()
    }

    fn is_not_null(&self) -> P {
        self.tautology()
    }
}

impl<P> fmt::Debug for BoolFilter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoolFilter")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}
