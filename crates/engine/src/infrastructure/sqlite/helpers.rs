//! Row conversion helpers shared by the SQLite repositories.

use chrono::{DateTime, Utc};
use std::str::FromStr;
use worldkeeper_domain::common::from_millis;
use worldkeeper_domain::DomainError;

use crate::infrastructure::ports::RepoError;

/// Parse a stored id column.
pub(super) fn parse_id<T>(raw: &str) -> Result<T, RepoError>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(RepoError::serialization)
}

/// Convert a stored millisecond column into a timestamp.
pub(super) fn parse_millis(ms: i64) -> Result<DateTime<Utc>, RepoError> {
    from_millis(ms).ok_or_else(|| RepoError::serialization(format!("Invalid timestamp: {ms}")))
}

pub(super) fn parse_optional_millis(ms: Option<i64>) -> Result<Option<DateTime<Utc>>, RepoError> {
    ms.map(parse_millis).transpose()
}
