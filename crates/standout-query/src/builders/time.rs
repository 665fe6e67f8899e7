use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::builders::{FieldFilter, NullChecks};
use crate::combinators::{Atom, Combinators, SetAtom};
use crate::error::{QueryError, Result};
use crate::value::FilterValue;

/// Seconds from 0001-01-01T00:00:00Z to the Unix epoch.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Date-only format accepted after RFC 3339.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the zero timestamp, `0001-01-01T00:00:00Z`.
///
/// No stored timestamp precedes it, so `gte(zero_time())` matches every row.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Coerces a filter value to a timestamp.
///
/// Accepts [`FilterValue::Time`] as is, or a string in RFC 3339 form
/// (normalized to UTC) or `YYYY-MM-DD` form (midnight UTC), tried in that
/// order.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use standout_query::{parse_time_value, FilterValue};
///
/// let t = parse_time_value(&FilterValue::from("2024-01-15")).unwrap();
/// assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
///
/// assert!(parse_time_value(&FilterValue::from("not-a-date")).is_err());
/// ```
pub fn parse_time_value(value: &FilterValue) -> Result<DateTime<Utc>> {
    match value {
        FilterValue::Time(t) => Ok(*t),
        FilterValue::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            })
            .map_err(|_| QueryError::UnparseableTime { value: s.clone() }),
        other => Err(QueryError::UnparseableTime {
            value: format!("unsupported {} value", other.type_name()),
        }),
    }
}

/// What a [`TimeFilter`] does with a value it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeParsing {
    /// Substitute [`zero_time`] and log a warning.
    #[default]
    Lenient,
    /// Fail with [`QueryError::UnparseableTime`].
    Strict,
}

/// Atoms for filtering a timestamp field.
pub struct TimePredicates<P> {
    pub eq: Atom<DateTime<Utc>, P>,
    pub ne: Atom<DateTime<Utc>, P>,
    pub gt: Atom<DateTime<Utc>, P>,
    pub gte: Atom<DateTime<Utc>, P>,
    pub lt: Atom<DateTime<Utc>, P>,
    pub lte: Atom<DateTime<Utc>, P>,
    pub is_in: SetAtom<DateTime<Utc>, P>,
    pub not_in: SetAtom<DateTime<Utc>, P>,
}

impl<P> Clone for TimePredicates<P> {
    fn clone(&self) -> Self {
        TimePredicates {
            eq: self.eq.clone(),
            ne: self.ne.clone(),
            gt: self.gt.clone(),
            gte: self.gte.clone(),
            lt: self.lt.clone(),
            lte: self.lte.clone(),
            is_in: self.is_in.clone(),
            not_in: self.not_in.clone(),
        }
    }
}

/// [`FieldFilter`] for timestamp fields.
///
/// Values go through [`parse_time_value`]. Under the default
/// [`TimeParsing::Lenient`] policy an unparseable value becomes
/// [`zero_time`] rather than an error; in `in` / `nin` lists each element is
/// substituted on its own.
///
/// String matching is always true (`gte(zero_time())`). Non-nullable fields
/// answer null checks with `and(eq(zero), ne(zero))` and
/// `or(eq(zero), ne(zero))`.
pub struct TimeFilter<P> {
    field: String,
    predicates: TimePredicates<P>,
    combinators: Combinators<P>,
    nulls: Option<NullChecks<P>>,
    parsing: TimeParsing,
}

impl<P> TimeFilter<P> {
    /// Creates a lenient builder for a non-nullable timestamp field.
    pub fn new(
        field: impl Into<String>,
        predicates: TimePredicates<P>,
        combinators: Combinators<P>,
    ) -> Self {
        TimeFilter {
            field: field.into(),
            predicates,
            combinators,
            nulls: None,
            parsing: TimeParsing::default(),
        }
    }

    /// Makes the field nullable, delegating null checks to `nulls`.
    pub fn nullable(mut self, nulls: NullChecks<P>) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// Sets the parse-failure policy.
    pub fn with_parsing(mut self, parsing: TimeParsing) -> Self {
        self.parsing = parsing;
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

    /// Returns the parse-failure policy.
    pub fn parsing(&self) -> TimeParsing {
        self.parsing
    }

    fn coerce(&self, value: &FilterValue) -> Result<DateTime<Utc>> {
        match parse_time_value(value) {
            Ok(t) => Ok(t),
            Err(err) if self.parsing == TimeParsing::Strict => Err(err),
            Err(err) => {
                tracing::warn!(
                    field = %self.field,
                    error = %err,
                    "Substituting zero time for unparseable filter value"
                );
                Ok(zero_time())
            }
        }
    }

    fn coerce_all(&self, values: &[FilterValue]) -> Result<Vec<DateTime<Utc>>> {
        values.iter().map(|v| self.coerce(v)).collect()
    }

    fn zero_pair(&self) -> Vec<P> {
        let zero = zero_time();
        vec![(self.predicates.eq)(zero), (self.predicates.ne)(zero)]
    }

    fn tautology(&self) -> P {
        (self.predicates.gte)(zero_time())
    }
}

impl<P> FieldFilter<P> for TimeFilter<P> {
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
        match &self.nulls {
            Some(nulls) => (nulls.is_nil)(),
            None => self.combinators.and(self.zero_pair()),
        }
    }

    fn is_not_null(&self) -> P {
        match &self.nulls {
            Some(nulls) => (nulls.is_not_nil)(),
            None => self.combinators.or(self.zero_pair()),
        }
    }
}

impl<P> fmt::Debug for TimeFilter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeFilter")
            .field("field", &self.field)
            .field("nullable", &self.is_nullable())
            .field("parsing", &self.parsing)
            .finish_non_exhaustive()
    }
}
