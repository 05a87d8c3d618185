use rusqlite::{params, OptionalExtension};

use super::Store;

use crate::{
    errors::SnapshotErr,
    measurement::Measurement,
    station::{Station, StationId},
};

impl Store {
    /// Retrieve all stations, ordered by id.
    pub fn stations(&self) -> Result<Vec<Station>, SnapshotErr> {
        let mut stmt = self.db_conn.prepare(
            "SELECT station_id, name, lat, lon, region FROM stations ORDER BY station_id",
        )?;

        let vals: Result<Vec<Station>, SnapshotErr> = stmt
            .query_map(params![], |row| Self::parse_row_to_station(row, 0))?
            .map(|res| res.map_err(SnapshotErr::Database))
            .collect();

        vals
    }

    /// Retrieve the information about a single station.
    pub fn station(&self, station_id: StationId) -> Result<Option<Station>, SnapshotErr> {
        let station = self
            .db_conn
            .query_row(
                "SELECT station_id, name, lat, lon, region FROM stations WHERE station_id = ?1",
                params![station_id],
                |row| Self::parse_row_to_station(row, 0),
            )
            .optional()?;

        Ok(station)
    }

    /// Retrieve all measurements, ordered by id.
    pub fn measurements(&self) -> Result<Vec<Measurement>, SnapshotErr> {
        let mut stmt = self.db_conn.prepare(
            "
                SELECT
                    measurement_id,
                    station_id,
                    timestamp,
                    temperature,
                    ground_temperature,
                    feel_temperature,
                    wind_gusts,
                    wind_speed_bft,
                    humidity,
                    precipitation,
                    sun_power
                FROM measurements
                ORDER BY measurement_id
            ",
        )?;

        let vals: Result<Vec<Measurement>, SnapshotErr> = stmt
            .query_map(params![], |row| Self::parse_row_to_measurement(row, 0))?
            .map(|res| res.map_err(SnapshotErr::Database))
            .collect();

        vals
    }

    /// Number of stations in the current snapshot.
    pub fn station_count(&self) -> Result<u32, SnapshotErr> {
        self.count("SELECT COUNT(*) FROM stations")
    }

    /// Number of measurements in the current snapshot.
    pub fn measurement_count(&self) -> Result<u32, SnapshotErr> {
        self.count("SELECT COUNT(*) FROM measurements")
    }

    /// Number of measurements whose station is missing. Zero unless the store is corrupt.
    pub fn orphan_measurement_count(&self) -> Result<u32, SnapshotErr> {
        self.count(
            "
                SELECT COUNT(*)
                FROM measurements m LEFT JOIN stations s ON m.station_id = s.station_id
                WHERE s.station_id IS NULL
            ",
        )
    }

    /// Select database size in bytes.
    pub fn db_size(&self) -> Result<u64, SnapshotErr> {
        let size: i64 = self.db_conn.query_row(
            "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
            params![],
            |row| row.get(0),
        )?;

        Ok(size as u64)
    }

    fn count(&self, sql: &str) -> Result<u32, SnapshotErr> {
        let num: u32 = self.db_conn.query_row(sql, params![], |row| row.get(0))?;
        Ok(num)
    }

    /// Read a station from five columns starting at `first`: id, name, lat, lon, region.
    pub(crate) fn parse_row_to_station(
        row: &rusqlite::Row,
        first: usize,
    ) -> Result<Station, rusqlite::Error> {
        Ok(Station {
            station_id: row.get(first)?,
            name: row.get(first + 1)?,
            latitude: row.get(first + 2)?,
            longitude: row.get(first + 3)?,
            region: row.get(first + 4)?,
        })
    }

    /// Read a measurement from eleven columns starting at `first`, in the order of the
    /// `measurements` select above.
    pub(crate) fn parse_row_to_measurement(
        row: &rusqlite::Row,
        first: usize,
    ) -> Result<Measurement, rusqlite::Error> {
        let wind_speed_bft: Option<i64> = row.get(first + 7)?;

        Ok(Measurement {
            measurement_id: row.get(first)?,
            station_id: row.get(first + 1)?,
            timestamp: row.get(first + 2)?,
            temperature: row.get(first + 3)?,
            ground_temperature: row.get(first + 4)?,
            feel_temperature: row.get(first + 5)?,
            wind_gusts: row.get(first + 6)?,
            wind_speed_bft: wind_speed_bft.map(|bft| bft as u32),
            humidity: row.get(first + 8)?,
            precipitation: row.get(first + 9)?,
            sun_power: row.get(first + 10)?,
        })
    }
}
