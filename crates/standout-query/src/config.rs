//! Query adapter configuration.
//!
//! The crate knows nothing about the caller's query type. A [`QueryConfig`]
//! carries the one function needed to narrow it: attach a predicate as a
//! WHERE condition.

use std::fmt;
use std::sync::Arc;

/// Attaches predicates of type `P` to queries of type `Q`.
///
/// # Example
///
/// ```
/// use standout_query::QueryConfig;
///
/// let cfg = QueryConfig::new(|mut q: Vec<String>, p: String| {
///     q.push(p);
///     q
/// });
///
/// let q = cfg.apply(Vec::new(), "active = true".to_string());
/// assert_eq!(q, vec!["active = true"]);
/// ```
pub struct QueryConfig<Q, P> {
    where_fn: Arc<dyn Fn(Q, P) -> Q + Send + Sync>,
}

impl<Q, P> QueryConfig<Q, P> {
    /// Creates a config from the backend's WHERE function.
    pub fn new(where_fn: impl Fn(Q, P) -> Q + Send + Sync + 'static) -> Self {
        QueryConfig {
            where_fn: Arc::new(where_fn),
        }
    }

    /// Applies one predicate to the query.
    pub fn apply(&self, query: Q, predicate: P) -> Q {
        (self.where_fn)(query, predicate)
    }
}

impl<Q, P> Clone for QueryConfig<Q, P> {
    fn clone(&self) -> Self {
        QueryConfig {
            where_fn: Arc::clone(&self.where_fn),
        }
    }
}

impl<Q, P> fmt::Debug for QueryConfig<Q, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfig").finish_non_exhaustive()
    }
}
