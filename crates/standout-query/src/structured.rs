//! Structured filter evaluation.
//!
//! A [`FilterGroup`] is a flat list of `{field, operator, value}` filters
//! plus AND/OR logic, usually decoded straight from a request:
//!
//! ```json
//! {"filters": [{"field": "email", "operator": "contains", "value": "john"}], "logic": "and"}
//! ```
//!
//! [`evaluate`] resolves each filter against a [`FilterRegistry`] and folds
//! the results into at most one predicate. Evaluation is permissive about
//! shape and strict about types:
//!
//! - filters on unregistered fields are dropped
//! - unrecognized operators behave as `eq`
//! - a value of the wrong type fails the whole evaluation

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::builders::FieldFilter;
use crate::combinators::Combinators;
use crate::config::QueryConfig;
use crate::error::Result;
use crate::op::Operator;
use crate::registry::FilterRegistry;
use crate::value::FilterValue;

/// Reads an explicit JSON `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One leaf condition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Registered field name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub field: String,
    /// Comparison to apply.
    #[serde(default)]
    pub operator: Operator,
    /// Operand. Scalar for comparisons, list for `in`/`nin`, ignored by null
    /// checks.
    #[serde(default)]
    pub value: FilterValue,
}

impl Filter {
    /// Creates a filter.
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Filter {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// How the filters of a group are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Logic {
    /// Every filter must hold.
    #[default]
    And,
    /// At least one filter must hold.
    Or,
}

impl Logic {
    /// Parses a logic tag. Only the exact tag `"or"` selects [`Logic::Or`].
    pub fn parse(tag: &str) -> Logic {
        if tag == "or" {
            Logic::Or
        } else {
            Logic::And
        }
    }

    /// Returns the wire tag of this logic.
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::And => "and",
            Logic::Or => "or",
        }
    }
}

impl From<&str> for Logic {
    fn from(tag: &str) -> Self {
        Logic::parse(tag)
    }
}

impl From<String> for Logic {
    fn from(tag: String) -> Self {
        Logic::parse(&tag)
    }
}

/// A missing tag (JSON `null`) is [`Logic::And`].
impl From<Option<String>> for Logic {
    fn from(tag: Option<String>) -> Self {
        tag.as_deref().map(Logic::parse).unwrap_or_default()
    }
}

impl From<Logic> for String {
    fn from(logic: Logic) -> Self {
        logic.as_str().to_string()
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filters combined with one logic.
///
/// # Example
///
/// ```
/// use standout_query::{Filter, FilterGroup, Logic, Operator};
///
/// let group: FilterGroup = serde_json::from_str(
///     r#"{"filters": [{"field": "email", "operator": "startswith", "value": "john"}]}"#,
/// )
/// .unwrap();
///
/// assert_eq!(group.logic, Logic::And);
/// assert_eq!(group.filters, vec![Filter::new("email", Operator::StartsWith, "john")]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Filters in declaration order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub filters: Vec<Filter>,
    /// Combination logic, AND unless the tag is exactly `"or"`.
    #[serde(default)]
    pub logic: Logic,
}

impl FilterGroup {
    /// Creates an empty AND group.
    pub fn new() -> Self {
        FilterGroup::default()
    }

    /// Creates an empty group with the given logic.
    pub fn with_logic(logic: Logic) -> Self {
        FilterGroup {
            filters: Vec::new(),
            logic,
        }
    }

    /// Appends a filter.
    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.filters.push(Filter::new(field, operator, value));
        self
    }

    /// Returns `true` if the group has no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Dispatches one filter's operator to a field builder.
///
/// `in`/`nin` wrap a scalar value into a one-element list. String matching
/// reads a non-string value as the empty string. Unrecognized operators fall
/// back to `eq`.
pub fn build_predicate<P>(builder: &dyn FieldFilter<P>, filter: &Filter) -> Result<P> {
    let value = &filter.value;
    match &filter.operator {
        Operator::Eq => builder.eq(value),
        Operator::Ne => builder.ne(value),
        Operator::Gt => builder.gt(value),
        Operator::Gte => builder.gte(value),
        Operator::Lt => builder.lt(value),
        Operator::Lte => builder.lte(value),
        Operator::In => builder.is_in(value.as_elements()),
        Operator::Nin => builder.not_in(value.as_elements()),
        Operator::Contains => Ok(builder.contains(text_of(value))),
        Operator::StartsWith => Ok(builder.starts_with(text_of(value))),
        Operator::EndsWith => Ok(builder.ends_with(text_of(value))),
        Operator::Null => Ok(builder.is_null()),
        Operator::NotNull => Ok(builder.is_not_null()),
        Operator::Unrecognized(tag) => {
            tracing::debug!(field = %filter.field, operator = %tag, "Unknown operator, using eq");
            builder.eq(value)
        }
    }
}

fn text_of(value: &FilterValue) -> &str {
    value.as_str().unwrap_or("")
}

/// Folds a filter group into at most one predicate.
///
/// Returns `Ok(None)` when nothing constrains the query: the group is empty
/// or every filter named an unregistered field. A single surviving predicate
/// is returned as is; two or more are joined with `and` (or `or` for
/// [`Logic::Or`]).
pub fn evaluate<P>(
    group: &FilterGroup,
    registry: &FilterRegistry<P>,
    combinators: &Combinators<P>,
) -> Result<Option<P>> {
    if group.filters.is_empty() {
        return Ok(None);
    }

    let mut predicates = Vec::with_capacity(group.filters.len());
    for filter in &group.filters {
        let Some(builder) = registry.get(&filter.field) else {
            tracing::debug!(field = %filter.field, "Skipping filter on unknown field");
            continue;
        };
        predicates.push(build_predicate(builder.as_ref(), filter)?);
    }

    if predicates.len() <= 1 {
        return Ok(predicates.pop());
    }

    tracing::trace!(logic = %group.logic, count = predicates.len(), "Combining filter predicates");
    Ok(Some(match group.logic {
        Logic::Or => combinators.or(predicates),
        Logic::And => combinators.and(predicates),
    }))
}

/// Evaluates a filter group and applies the result to a query.
///
/// The query comes back untouched when the group yields no predicate.
pub fn apply_structured_filters<Q, P>(
    query: Q,
    cfg: &QueryConfig<Q, P>,
    group: &FilterGroup,
    registry: &FilterRegistry<P>,
    combinators: &Combinators<P>,
) -> Result<Q> {
    Ok(match evaluate(group, registry, combinators)? {
        Some(predicate) => cfg.apply(query, predicate),
        None => query,
    })
}
