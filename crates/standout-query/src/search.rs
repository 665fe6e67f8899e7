//! One-shot query narrowing: single predicates, ID lists, and free-text
//! search.

use std::collections::BTreeMap;

use crate::combinators::{Atom, Combinators};
use crate::config::QueryConfig;

/// Searchable fields: name to a case-insensitive "contains" atom.
///
/// A `BTreeMap` keeps the generated predicates in field-name order.
pub type SearchFields<P> = BTreeMap<String, Atom<String, P>>;

/// Applies a single predicate to a query.
pub fn apply_where<Q, P>(query: Q, cfg: &QueryConfig<Q, P>, predicate: P) -> Q {
    cfg.apply(query, predicate)
}

/// Restricts a query to records with the given IDs.
///
/// An empty ID list leaves the query unchanged rather than matching nothing.
pub fn apply_ids<Q, P, I>(
    query: Q,
    cfg: &QueryConfig<Q, P>,
    id_in: impl Fn(Vec<I>) -> P,
    ids: Vec<I>,
) -> Q {
    if ids.is_empty() {
        return query;
    }
    cfg.apply(query, id_in(ids))
}

/// Applies free-text search across several fields.
///
/// The search string is split on whitespace. Each token must match at least
/// one field, and every token must match:
///
/// ```text
/// "john doe" over {first, last}
///   => (first ~ john OR last ~ john) AND (first ~ doe OR last ~ doe)
/// ```
///
/// A blank search or an empty field set leaves the query unchanged. A single
/// token is applied without the outer AND.
pub fn apply_search<Q, P>(
    query: Q,
    cfg: &QueryConfig<Q, P>,
    fields: &SearchFields<P>,
    combinators: &Combinators<P>,
    search: &str,
) -> Q {
    if fields.is_empty() {
        return query;
    }

    let mut token_predicates: Vec<P> = search
        .split_whitespace()
        .map(|token| {
            let per_field = fields
                .values()
                .map(|contains| contains(token.to_string()))
                .collect();
            combinators.or(per_field)
        })
        .collect();

    let predicate = match token_predicates.len() {
        0 => return query,
        1 => token_predicates.remove(0),
        _ => combinators.and(token_predicates),
    };

    tracing::trace!(search, "Applying search predicate");
    cfg.apply(query, predicate)
}
