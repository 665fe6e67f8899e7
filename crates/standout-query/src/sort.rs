//! Field-based ordering.
//!
//! Requests name fields by their API names; [`SortFields`] maps those onto
//! backend fields, and an [`OrderBuilder`] turns each into the backend's
//! ordering term. Unknown fields are ignored.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// API field name to backend field name, e.g. `"created" => "created_at"`.
pub type SortFields = HashMap<String, String>;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SortOrder {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl SortOrder {
    /// Parses a direction tag. Only the exact tag `"desc"` is descending.
    pub fn parse(tag: &str) -> SortOrder {
        if tag == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, SortOrder::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, SortOrder::Desc)
    }

    /// Returns the wire tag of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl From<String> for SortOrder {
    fn from(tag: String) -> Self {
        SortOrder::parse(&tag)
    }
}

/// A missing tag (JSON `null`) is [`SortOrder::Asc`].
impl From<Option<String>> for SortOrder {
    fn from(tag: Option<String>) -> Self {
        tag.as_deref().map(SortOrder::parse).unwrap_or_default()
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        order.as_str().to_string()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort criterion from a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// API field name.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub order: SortOrder,
}

impl Criteria {
    /// Creates an ascending criterion.
    pub fn asc(field: impl Into<String>) -> Self {
        Criteria {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    /// Creates a descending criterion.
    pub fn desc(field: impl Into<String>) -> Self {
        Criteria {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Builds the backend's ordering terms.
pub trait OrderBuilder {
    /// Backend ordering term, e.g. an `ORDER BY` fragment.
    type Order;

    /// Ascending order on a backend field.
    fn asc(&self, field: &str) -> Self::Order;

    /// Descending order on a backend field.
    fn desc(&self, field: &str) -> Self::Order;

    /// Ordering term for a field in the given direction.
    fn order(&self, field: &str, order: SortOrder) -> Self::Order {
        match order {
            SortOrder::Asc => self.asc(field),
            SortOrder::Desc => self.desc(field),
        }
    }
}

/// Attaches ordering terms of type `O` to queries of type `Q`.
pub struct Config<Q, O> {
    order: Arc<dyn Fn(Q, Vec<O>) -> Q + Send + Sync>,
}

impl<Q, O> Config<Q, O> {
    /// Creates a config from the backend's ORDER BY function.
    pub fn new(order: impl Fn(Q, Vec<O>) -> Q + Send + Sync + 'static) -> Self {
        Config {
            order: Arc::new(order),
        }
    }
}

impl<Q, O> Clone for Config<Q, O> {
    fn clone(&self) -> Self {
        Config {
            order: Arc::clone(&self.order),
        }
    }
}

impl<Q, O> fmt::Debug for Config<Q, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("sort::Config").finish_non_exhaustive()
    }
}

/// Sorts by one field.
///
/// An empty or unknown `sort_by` leaves the query unchanged. Any direction
/// other than `"desc"` sorts ascending.
pub fn apply<Q, B: OrderBuilder>(
    query: Q,
    cfg: &Config<Q, B::Order>,
    fields: &SortFields,
    builder: &B,
    sort_by: &str,
    sort_dir: &str,
) -> Q {
    if sort_by.is_empty() {
        return query;
    }
    let Some(field) = fields.get(sort_by) else {
        tracing::debug!(field = sort_by, "Ignoring sort on unknown field");
        return query;
    };
    (cfg.order)(query, vec![builder.order(field, SortOrder::parse(sort_dir))])
}

/// Sorts by several fields, the first being the primary key.
///
/// Unknown fields are skipped. All terms go to the backend in one call, in
/// criteria order.
pub fn apply_multiple<Q, B: OrderBuilder>(
    query: Q,
    cfg: &Config<Q, B::Order>,
    fields: &SortFields,
    builder: &B,
    criteria: &[Criteria],
) -> Q {
    let orders: Vec<B::Order> = criteria
        .iter()
        .filter_map(|c| match fields.get(&c.field) {
            Some(field) => Some(builder.order(field, c.order)),
            None => {
                tracing::debug!(field = %c.field, "Ignoring sort on unknown field");
                None
            }
        })
        .collect();

    if orders.is_empty() {
        return query;
    }
    (cfg.order)(query, orders)
}
