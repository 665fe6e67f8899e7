//! Declarative field registration.
//!
//! Fields are described once as [`FieldSpec`]s (a name plus a factory) and
//! turned into builders by [`FilterRegistry::build`], which injects the
//! shared [`Combinators`]. The same descriptors can therefore be reused with
//! different backends that share value semantics.
//!
//! # Example
//!
//! ```
//! use standout_query::{
//!     atom, set_atom, string_field, Combinators, FieldFilter, FilterRegistry, StringPredicates,
//! };
//!
//! let email = StringPredicates {
//!     eq: atom(|v: String| format!("email = '{v}'")),
//!     ne: atom(|v: String| format!("email <> '{v}'")),
//!     gt: atom(|v: String| format!("email > '{v}'")),
//!     gte: atom(|v: String| format!("email >= '{v}'")),
//!     lt: atom(|v: String| format!("email < '{v}'")),
//!     lte: atom(|v: String| format!("email <= '{v}'")),
//!     is_in: set_atom(|vs: Vec<String>| format!("email IN ({})", vs.join(", "))),
//!     not_in: set_atom(|vs: Vec<String>| format!("email NOT IN ({})", vs.join(", "))),
//!     contains: atom(|v: String| format!("email ILIKE '%{v}%'")),
//!     starts_with: atom(|v: String| format!("email ILIKE '{v}%'")),
//!     ends_with: atom(|v: String| format!("email ILIKE '%{v}'")),
//! };
//!
//! let combinators = Combinators::new(
//!     |ps: Vec<String>| format!("({})", ps.join(" AND ")),
//!     |ps: Vec<String>| format!("({})", ps.join(" OR ")),
//! );
//!
//! let registry = FilterRegistry::build(&combinators, [string_field("email", email)]);
//! assert!(registry.contains("email"));
//! assert_eq!(
//!     registry.get("email").unwrap().is_not_null(),
//!     "(email = '' OR email <> '')"
//! );
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::builders::{
    BoolFilter, BoolPredicates, FieldFilter, NullChecks, StringFilter, StringPredicates,
    TimeFilter, TimeParsing, TimePredicates,
};
use crate::combinators::Combinators;

/// Shared handle to a field builder.
pub type SharedFieldFilter<P> = Arc<dyn FieldFilter<P>>;

type Factory<P> = Arc<dyn Fn(&Combinators<P>) -> SharedFieldFilter<P> + Send + Sync>;

/// A named, not-yet-built field filter.
///
/// Created with [`string_field`], [`nullable_string_field`], [`bool_field`],
/// [`time_field`], [`nullable_time_field`], [`strict_time_field`], or
/// [`FieldSpec::custom`].
pub struct FieldSpec<P> {
    name: String,
    factory: Factory<P>,
}

impl<P: 'static> FieldSpec<P> {
    /// Describes a field backed by a caller-defined builder.
    pub fn custom<F, B>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Combinators<P>) -> B + Send + Sync + 'static,
        B: FieldFilter<P> + 'static,
    {
        FieldSpec {
            name: name.into(),
            factory: Arc::new(move |combinators: &Combinators<P>| -> SharedFieldFilter<P> {
                Arc::new(factory(combinators))
            }),
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds the field's filter with the given combinators.
    pub fn create(&self, combinators: &Combinators<P>) -> SharedFieldFilter<P> {
        (self.factory)(combinators)
    }
}

impl<P> Clone for FieldSpec<P> {
    fn clone(&self) -> Self {
        FieldSpec {
            name: self.name.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<P> fmt::Debug for FieldSpec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Describes a non-nullable string field.
pub fn string_field<P: 'static>(
    name: impl Into<String>,
    predicates: StringPredicates<P>,
) -> FieldSpec<P> {
    let name = name.into();
    let field = name.clone();
    FieldSpec::custom(name, move |combinators| {
        StringFilter::new(field.clone(), predicates.clone(), combinators.clone())
    })
}

/// Describes a nullable string field.
pub fn nullable_string_field<P: 'static>(
    name: impl Into<String>,
    predicates: StringPredicates<P>,
    nulls: NullChecks<P>,
) -> FieldSpec<P> {
    let name = name.into();
    let field = name.clone();
    FieldSpec::custom(name, move |combinators| {
        StringFilter::new(field.clone(), predicates.clone(), combinators.clone())
            .nullable(nulls.clone())
    })
}

/// Describes a boolean field.
pub fn bool_field<P: 'static>(
    name: impl Into<String>,
    predicates: BoolPredicates<P>,
) -> FieldSpec<P> {
    let name = name.into();
    let field = name.clone();
    FieldSpec::custom(name, move |combinators| {
        BoolFilter::new(field.clone(), predicates.clone(), combinators.clone())
    })
}

/// Describes a non-nullable timestamp field with lenient parsing.
pub fn time_field<P: 'static>(
    name: impl Into<String>,
    predicates: TimePredicates<P>,
) -> FieldSpec<P> {
    time_spec(name.into(), predicates, None, TimeParsing::Lenient)
}

/// Describes a nullable timestamp field with lenient parsing.
pub fn nullable_time_field<P: 'static>(
    name: impl Into<String>,
    predicates: TimePredicates<P>,
    nulls: NullChecks<P>,
) -> FieldSpec<P> {
    time_spec(name.into(), predicates, Some(nulls), TimeParsing::Lenient)
}

/// Describes a non-nullable timestamp field that rejects unparseable values.
pub fn strict_time_field<P: 'static>(
    name: impl Into<String>,
    predicates: TimePredicates<P>,
) -> FieldSpec<P> {
    time_spec(name.into(), predicates, None, TimeParsing::Strict)
}

fn time_spec<P: 'static>(
    name: String,
    predicates: TimePredicates<P>,
    nulls: Option<NullChecks<P>>,
    parsing: TimeParsing,
) -> FieldSpec<P> {
    let field = name.clone();
    FieldSpec::custom(name, move |combinators| {
        let filter = TimeFilter::new(field.clone(), predicates.clone(), combinators.clone())
            .with_parsing(parsing);
        match &nulls {
            Some(nulls) => filter.nullable(nulls.clone()),
            None => filter,
        }
    })
}

/// Immutable map from field name to builder.
///
/// Lookups are exact and case-sensitive. When two specs share a name the
/// later one wins.
pub struct FilterRegistry<P> {
    fields: HashMap<String, SharedFieldFilter<P>>,
}

impl<P> FilterRegistry<P> {
    /// Builds every field spec with the shared combinators.
    pub fn build<I>(combinators: &Combinators<P>, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldSpec<P>>,
    {
        let mut map = HashMap::new();
        for spec in fields {
            let filter = (spec.factory)(combinators);
            if map.insert(spec.name.clone(), filter).is_some() {
                tracing::warn!(field = %spec.name, "Duplicate filter field, keeping the last one");
            }
        }
        FilterRegistry { fields: map }
    }

    /// Looks up the builder for a field.
    pub fn get(&self, name: &str) -> Option<&SharedFieldFilter<P>> {
        self.fields.get(name)
    }

    /// Returns `true` if a builder is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the registered field names, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<P> Default for FilterRegistry<P> {
    fn default() -> Self {
        FilterRegistry {
            fields: HashMap::new(),
        }
    }
}

impl<P> Clone for FilterRegistry<P> {
    fn clone(&self) -> Self {
        FilterRegistry {
            fields: self.fields.clone(),
        }
    }
}

impl<P> fmt::Debug for FilterRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("fields", &self.field_names())
            .finish()
    }
}
