use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt::Display;

/// New type wrapper for a station id as used by the feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId {
    num: u32,
}

impl From<u32> for StationId {
    fn from(val: u32) -> Self {
        StationId { num: val }
    }
}

impl From<StationId> for u32 {
    fn from(id: StationId) -> Self {
        id.num
    }
}

impl From<StationId> for i64 {
    fn from(id: StationId) -> Self {
        i64::from(id.num)
    }
}

impl Display for StationId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(formatter, "{}", self.num)
    }
}

impl ToSql for StationId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.num)))
    }
}

impl FromSql for StationId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        u32::column_result(value).map(StationId::from)
    }
}

impl StationId {
    /// Create a new one.
    pub const fn new(num: u32) -> Self {
        StationId { num }
    }
}
