//! Caller-supplied predicate algebra.
//!
//! The crate never looks inside a predicate. It only builds them through
//! atoms handed in by the caller (one per field and operator) and joins them
//! through a [`Combinators`] pair.

use std::fmt;
use std::sync::Arc;

/// Atomic predicate constructor taking one value, e.g. `email = ?`.
pub type Atom<T, P> = Arc<dyn Fn(T) -> P + Send + Sync>;

/// Atomic predicate constructor taking a set of values, e.g. `email IN (?)`.
pub type SetAtom<T, P> = Arc<dyn Fn(Vec<T>) -> P + Send + Sync>;

/// Atomic predicate constructor taking no value, e.g. `email IS NULL`.
pub type NullAtom<P> = Arc<dyn Fn() -> P + Send + Sync>;

/// Wraps a closure as an [`Atom`].
pub fn atom<T, P>(f: impl Fn(T) -> P + Send + Sync + 'static) -> Atom<T, P> {
    Arc::new(f)
}

/// Wraps a closure as a [`SetAtom`].
pub fn set_atom<T, P>(f: impl Fn(Vec<T>) -> P + Send + Sync + 'static) -> SetAtom<T, P> {
    Arc::new(f)
}

/// Wraps a closure as a [`NullAtom`].
pub fn null_atom<P>(f: impl Fn() -> P + Send + Sync + 'static) -> NullAtom<P> {
    Arc::new(f)
}

type Join<P> = Arc<dyn Fn(Vec<P>) -> P + Send + Sync>;

/// AND / OR over any number of predicates.
///
/// Both functions are assumed associative and commutative. Builders use
/// them to synthesize tautologies (`or(x = s, x != s)`) and contradictions
/// (`and(x = s, x != s)`) from a field's own atoms, so they must accept any
/// count of inputs, including two.
///
/// # Example
///
/// ```
/// use standout_query::Combinators;
///
/// let combinators = Combinators::new(
///     |parts: Vec<String>| format!("({})", parts.join(" AND ")),
///     |parts: Vec<String>| format!("({})", parts.join(" OR ")),
/// );
///
/// let p = combinators.or(vec!["a = 1".to_string(), "b = 2".to_string()]);
/// assert_eq!(p, "(a = 1 OR b = 2)");
/// ```
pub struct Combinators<P> {
    and: Join<P>,
    or: Join<P>,
}

impl<P> Combinators<P> {
    /// Creates a combinator pair from AND and OR functions.
    pub fn new(
        and: impl Fn(Vec<P>) -> P + Send + Sync + 'static,
        or: impl Fn(Vec<P>) -> P + Send + Sync + 'static,
    ) -> Self {
        Combinators {
            and: Arc::new(and),
            or: Arc::new(or),
        }
    }

    /// Combines predicates so that all must hold.
    pub fn and(&self, predicates: Vec<P>) -> P {
        (self.and)(predicates)
    }

    /// Combines predicates so that at least one must hold.
    pub fn or(&self, predicates: Vec<P>) -> P {
        (self.or)(predicates)
    }
}

// Manual impl: derive would require `P: Clone`.
impl<P> Clone for Combinators<P> {
    fn clone(&self) -> Self {
        Combinators {
            and: Arc::clone(&self.and),
            or: Arc::clone(&self.or),
        }
    }
}

impl<P> fmt::Debug for Combinators<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combinators").finish_non_exhaustive()
    }
}
