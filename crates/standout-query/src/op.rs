//! Filter operators.
//!
//! The [`Operator`] enum names the thirteen comparisons a
//! [`FieldFilter`](crate::FieldFilter) understands. Decoding never fails:
//! unknown tags are kept in [`Operator::Unrecognized`] and evaluated as
//! equality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operator for a structured filter.
///
/// Operators are grouped by intent:
/// - **Equality**: `Eq`, `Ne`
/// - **Comparison**: `Gt`, `Gte`, `Lt`, `Lte`
/// - **Membership**: `In`, `Nin`
/// - **String matching**: `Contains`, `StartsWith`, `EndsWith`
/// - **Null checks**: `Null`, `NotNull`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Operator {
    /// Equal.
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Value is one of a set.
    In,
    /// Value is none of a set.
    Nin,
    /// Contains a substring.
    Contains,
    /// Starts with a prefix.
    StartsWith,
    /// Ends with a suffix.
    EndsWith,
    /// Field is null.
    Null,
    /// Field is not null.
    NotNull,
    /// Tag outside the known set, kept verbatim.
    Unrecognized(String),
}

impl Operator {
    /// All recognized operators, in wire-tag order.
    pub const ALL: [Operator; 13] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Nin,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Null,
        Operator::NotNull,
    ];

    /// Parses a wire tag. Matching is exact and case-sensitive.
    pub fn parse(tag: &str) -> Operator {
        match tag {
            "eq" => Operator::Eq,
            "ne" => Operator::Ne,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "in" => Operator::In,
            "nin" => Operator::Nin,
            "contains" => Operator::Contains,
            "startswith" => Operator::StartsWith,
            "endswith" => Operator::EndsWith,
            "null" => Operator::Null,
            "nnull" => Operator::NotNull,
            other => Operator::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire tag of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::Contains => "contains",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::Null => "null",
            Operator::NotNull => "nnull",
            Operator::Unrecognized(tag) => tag,
        }
    }
}

impl From<&str> for Operator {
    fn from(tag: &str) -> Self {
        Operator::parse(tag)
    }
}

impl From<String> for Operator {
    fn from(tag: String) -> Self {
        match Operator::parse(&tag) {
            Operator::Unrecognized(_) => Operator::Unrecognized(tag),
            known => known,
        }
    }
}

/// A missing tag (JSON `null`) is [`Operator::Eq`].
impl From<Option<String>> for Operator {
    fn from(tag: Option<String>) -> Self {
        tag.map(Operator::from).unwrap_or_default()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unrecognized(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
