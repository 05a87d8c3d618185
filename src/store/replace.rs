use log::{debug, info, warn};
use rusqlite::params;

use super::Store;

use crate::{
    errors::SnapshotErr, measurement::Measurement, snapshot::Snapshot, station::Station,
};

impl Store {
    /// Replace everything in the store with a new snapshot.
    ///
    /// All old rows are deleted and the new ones inserted, stations first, in one transaction.
    /// If anything fails, e.g. a measurement refers to a station that is not in `stations`, the
    /// transaction is rolled back and the previous snapshot is left untouched. A station id
    /// given more than once keeps the last one.
    pub fn replace_snapshot(
        &mut self,
        stations: &[Station],
        measurements: &[Measurement],
    ) -> Result<(), SnapshotErr> {
        let tx = self.db_conn.transaction()?;

        tx.execute_batch(include_str!("replace/clear.sql"))?;

        {
            let mut insert_station = tx.prepare(include_str!("replace/insert_station.sql"))?;
            for station in stations {
                insert_station.execute(params![
                    station.station_id,
                    station.name,
                    station.latitude,
                    station.longitude,
                    station.region,
                ])?;
            }

            let mut insert_measurement =
                tx.prepare(include_str!("replace/insert_measurement.sql"))?;
            for measurement in measurements {
                insert_measurement.execute(params![
                    measurement.measurement_id,
                    measurement.timestamp,
                    measurement.temperature,
                    measurement.ground_temperature,
                    measurement.feel_temperature,
                    measurement.wind_gusts,
                    measurement.wind_speed_bft.map(i64::from),
                    measurement.humidity,
                    measurement.precipitation,
                    measurement.sun_power,
                    measurement.station_id,
                ])?;
            }
        }

        tx.commit()?;
        info!(
            "Stored snapshot with {} stations and {} measurements",
            stations.len(),
            measurements.len()
        );

        // The new snapshot is committed at this point, a failed vacuum only costs disk space.
        match self.db_conn.execute_batch("VACUUM;") {
            Ok(()) => debug!("Compressed store."),
            Err(err) => warn!("Unable to compress store: {}", err),
        }

        Ok(())
    }

    /// Replace everything in the store with `snapshot`.
    pub fn replace(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotErr> {
        self.replace_snapshot(&snapshot.stations, &snapshot.measurements)
    }
}
