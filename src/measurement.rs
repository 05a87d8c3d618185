//! Measurements taken at a station.

use crate::station::StationId;
use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt::Display;

/// Locally assigned measurement id, only unique within one snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeasurementId(u32);

impl From<u32> for MeasurementId {
    fn from(val: u32) -> Self {
        MeasurementId(val)
    }
}

impl From<MeasurementId> for u32 {
    fn from(id: MeasurementId) -> Self {
        id.0
    }
}

impl Display for MeasurementId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(formatter, "{}", self.0)
    }
}

impl ToSql for MeasurementId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0)))
    }
}

impl FromSql for MeasurementId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        u32::column_result(value).map(MeasurementId)
    }
}

/// One set of observations from a station. Every value may be missing.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Measurement {
    pub measurement_id: MeasurementId,
    pub station_id: StationId,
    pub timestamp: Option<NaiveDateTime>,
    /// Air temperature, °C
    pub temperature: Option<f64>,
    /// Temperature at 10 cm above ground, °C
    pub ground_temperature: Option<f64>,
    /// Perceived temperature, °C
    pub feel_temperature: Option<f64>,
    /// m/s
    pub wind_gusts: Option<f64>,
    pub wind_speed_bft: Option<u32>,
    /// Relative humidity, percent
    pub humidity: Option<f64>,
    /// mm/h
    pub precipitation: Option<f64>,
    /// W/m²
    pub sun_power: Option<f64>,
}

impl Measurement {
    /// Create an empty measurement for a station.
    pub fn new(measurement_id: MeasurementId, station_id: StationId) -> Self {
        Measurement {
            measurement_id,
            station_id,
            ..Measurement::default()
        }
    }
}

