//! The fixed questions asked of every snapshot.
//!
//! Every query here is a single read only statement, so it sees one consistent snapshot even if
//! another connection is in the middle of a replace.

use crate::{
    errors::SnapshotErr,
    measurement::Measurement,
    station::Station,
    store::Store,
};
use rusqlite::{params, OptionalExtension};

mod report;

pub use report::{Question, Report, DEFAULT_REGION_MARKER};

/// A station and a temperature measured there.
#[derive(Clone, Debug, PartialEq)]
pub struct StationTemperature {
    /// The station
    pub station: Station,
    /// °C
    pub temperature: f64,
}

/// The measurement where the felt temperature is furthest from the actual one.
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureGap {
    /// Where it was measured
    pub station: Station,
    /// The measurement itself
    pub measurement: Measurement,
    /// `abs(feel_temperature - temperature)`
    pub gap: f64,
}

/// The most recent measurement of a station, one row of the table handed to a
/// [`ReportSink`](crate::ReportSink).
#[derive(Clone, Debug, PartialEq)]
pub struct LatestReading {
    /// The station
    pub station: Station,
    /// Its most recent measurement
    pub measurement: Measurement,
}

/// Read only queries over a store.
#[derive(Clone, Copy, Debug)]
pub struct Analytics<'a> {
    store: &'a Store,
}

impl<'a> Analytics<'a> {
    /// Ask questions about the snapshot currently in `store`.
    pub fn new(store: &'a Store) -> Self {
        Analytics { store }
    }

    /// All stations whose latest temperature equals the highest temperature in the snapshot.
    ///
    /// The maximum is taken over every measurement, so it can come from an older reading. Ties are
    /// all returned, ordered by station id. Empty if there is no temperature at all.
    pub fn highest_temperature_stations(&self) -> Result<Vec<StationTemperature>, SnapshotErr> {
        let mut stmt = self
            .store
            .conn()
            .prepare(include_str!("analytics/highest_temperature.sql"))?;

        let vals: Result<Vec<StationTemperature>, SnapshotErr> = stmt
            .query_map(params![], |row| {
                Ok(StationTemperature {
                    station: Store::parse_row_to_station(row, 0)?,
                    temperature: row.get(5)?,
                })
            })?
            .map(|res| res.map_err(SnapshotErr::Database))
            .collect();

        vals
    }

    /// Mean temperature over all measurements that have one, `None` if there are none.
    pub fn average_temperature(&self) -> Result<Option<f64>, SnapshotErr> {
        let avg: Option<f64> = self.store.conn().query_row(
            "SELECT AVG(temperature) FROM measurements",
            params![],
            |row| row.get(0),
        )?;

        Ok(avg)
    }

    /// The measurement with the largest `abs(feel_temperature - temperature)`.
    ///
    /// Measurements missing either value are skipped. Ties go to the lowest station id, then
    /// the lowest measurement id. `None` if no measurement has both values.
    pub fn largest_feel_vs_actual_gap(&self) -> Result<Option<TemperatureGap>, SnapshotErr> {
        let gap = self
            .store
            .conn()
            .query_row(
                include_str!("analytics/largest_feel_gap.sql"),
                params![],
                |row| {
                    Ok(TemperatureGap {
                        station: Store::parse_row_to_station(row, 0)?,
                        measurement: Store::parse_row_to_measurement(row, 5)?,
                        gap: row.get(16)?,
                    })
                },
            )
            .optional()?;

        Ok(gap)
    }

    /// Stations whose region contains `marker`, compared case sensitively, ordered by id.
    ///
    /// Stations without a region never match. An empty marker matches every station that has
    /// a region.
    pub fn stations_matching_region(&self, marker: &str) -> Result<Vec<Station>, SnapshotErr> {
        let mut stmt = self
            .store
            .conn()
            .prepare(include_str!("analytics/stations_in_region.sql"))?;

        let vals: Result<Vec<Station>, SnapshotErr> = stmt
            .query_map(params![marker], |row| Store::parse_row_to_station(row, 0))?
            .map(|res| res.map_err(SnapshotErr::Database))
            .collect();

        vals
    }

    /// The most recent measurement for every station, warmest first.
    ///
    /// "Most recent" is by timestamp, with missing timestamps treated as oldest and equal
    /// timestamps going to the highest measurement id. Rows without a temperature come last;
    /// equal temperatures are ordered by station id. Stations without measurements are left
    /// out.
    pub fn latest_per_station_table(&self) -> Result<Vec<LatestReading>, SnapshotErr> {
        let mut stmt = self
            .store
            .conn()
            .prepare(include_str!("analytics/latest_per_station.sql"))?;

        let vals: Result<Vec<LatestReading>, SnapshotErr> = stmt
            .query_map(params![], |row| {
                Ok(LatestReading {
                    station: Store::parse_row_to_station(row, 0)?,
                    measurement: Store::parse_row_to_measurement(row, 5)?,
                })
            })?
            .map(|res| res.map_err(SnapshotErr::Database))
            .collect();

        vals
    }
}

#[cfg(test)]
mod unit {
    use super::*;
    use crate::store::unit::*;
    use crate::{measurement::MeasurementId, station::StationId};

    fn ids(stations: impl IntoIterator<Item = Station>) -> Vec<u32> {
        stations
            .into_iter()
            .map(|station| station.station_id.into())
            .collect()
    }

    #[test]
    fn test_average_temperature() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let (stations, _) = sample_snapshot();
        let measurements = vec![
            measurement(0, 6260, 12, Some(10.0)),
            measurement(1, 6310, 12, Some(20.0)),
            measurement(2, 6320, 12, Some(30.0)),
        ];
        store.replace_snapshot(&stations, &measurements).unwrap();

        let avg = Analytics::new(&store).average_temperature().unwrap();
        assert_eq!(avg, Some(20.0));
    }

    #[test]
    fn test_average_ignores_missing_temperatures() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let (stations, _) = sample_snapshot();
        let measurements = vec![
            measurement(0, 6260, 12, Some(10.0)),
            measurement(1, 6310, 12, None),
            measurement(2, 6320, 12, Some(30.0)),
        ];
        store.replace_snapshot(&stations, &measurements).unwrap();

        let avg = Analytics::new(&store).average_temperature().unwrap();
        assert_eq!(avg, Some(20.0));
    }

    #[test]
    fn test_empty_snapshot_results() {
        let store = Store::open_in_memory().expect("Failed to open store.");
        let analytics = Analytics::new(&store);

        assert_eq!(analytics.average_temperature().unwrap(), None);
        assert!(analytics.highest_temperature_stations().unwrap().is_empty());
        assert_eq!(analytics.largest_feel_vs_actual_gap().unwrap(), None);
        assert!(analytics.stations_matching_region("Noordzee").unwrap().is_empty());
        assert!(analytics.latest_per_station_table().unwrap().is_empty());
    }

    #[test]
    fn test_highest_temperature_returns_all_ties() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let (stations, _) = sample_snapshot();
        let measurements = vec![
            measurement(0, 6260, 12, Some(15.0)),
            measurement(1, 6310, 12, Some(20.0)),
            measurement(2, 6320, 12, Some(20.0)),
        ];
        store.replace_snapshot(&stations, &measurements).unwrap();

        let highest = Analytics::new(&store)
            .highest_temperature_stations()
            .unwrap();

        assert_eq!(highest.len(), 2);
        assert!(highest.iter().all(|st| st.temperature == 20.0));
        assert_eq!(
            ids(highest.into_iter().map(|st| st.station)),
            vec![6310, 6320]
        );
    }

    #[test]
    fn test_highest_temperature_compares_latest_with_snapshot_maximum() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let (stations, _) = sample_snapshot();

        // The hottest reading is not the latest one for its station.
        let measurements = vec![
            measurement(0, 6260, 10, Some(25.0)),
            measurement(1, 6260, 12, Some(15.0)),
            measurement(2, 6310, 12, Some(20.0)),
        ];
        store.replace_snapshot(&stations, &measurements).unwrap();

        let highest = Analytics::new(&store)
            .highest_temperature_stations()
            .unwrap();
        assert!(highest.is_empty());

        // The hottest reading is the latest one for its station.
        let measurements = vec![
            measurement(0, 6260, 10, Some(15.0)),
            measurement(1, 6260, 12, Some(25.0)),
            measurement(2, 6310, 12, Some(20.0)),
        ];
        store.replace_snapshot(&stations, &measurements).unwrap();

        let highest = Analytics::new(&store)
            .highest_temperature_stations()
            .unwrap();
        assert_eq!(ids(highest.iter().map(|st| st.station.clone())), vec![6260]);
        assert_eq!(highest[0].temperature, 25.0);
    }

    #[test]
    fn test_largest_feel_gap() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let (stations, mut measurements) = sample_snapshot();
        measurements[0].feel_temperature = Some(11.0); // gap 4
        measurements[1].feel_temperature = Some(26.5); // gap 6.5
        measurements[2].feel_temperature = None;
        store.replace_snapshot(&stations, &measurements).unwrap();

        let gap = Analytics::new(&store)
            .largest_feel_vs_actual_gap()
            .unwrap()
            .expect("No gap found.");

        assert_eq!(gap.station.station_id, StationId::new(6310));
        assert_eq!(gap.measurement, measurements[1]);
        assert_eq!(gap.gap, 6.5);
    }

    #[test]
    fn test_largest_feel_gap_tie_goes_to_lowest_station() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let (stations, mut measurements) = sample_snapshot();
        measurements[0].feel_temperature = Some(12.0); // 6260, gap 3
        measurements[1].feel_temperature = Some(17.0); // 6310, gap 3
        measurements[2].feel_temperature = Some(7.0); // 6320, gap 3
        measurements.reverse();
        store.replace_snapshot(&stations, &measurements).unwrap();

        let gap = Analytics::new(&store)
            .largest_feel_vs_actual_gap()
            .unwrap()
            .expect("No gap found.");

        assert_eq!(gap.station.station_id, StationId::new(6260));
        assert_eq!(gap.gap, 3.0);
    }

    #[test]
    fn test_stations_matching_region() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let stations = vec![
            station(6225, "Meetstation IJmuiden", "Waddenzee"),
            station(6320, "Meetstation Lichteiland Goeree", "Noordzee kust"),
            station(6380, "Meetstation Maastricht", "Maas"),
        ];
        store.replace_snapshot(&stations, &[]).unwrap();

        let analytics = Analytics::new(&store);
        assert_eq!(
            analytics.stations_matching_region("Noordzee").unwrap(),
            vec![stations[1].clone()]
        );
        assert!(analytics.stations_matching_region("noordzee").unwrap().is_empty());
        assert_eq!(
            ids(analytics.stations_matching_region("zee").unwrap()),
            vec![6225, 6320]
        );
    }

    #[test]
    fn test_region_match_skips_missing_region() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let stations = vec![
            Station::new(StationId::new(6200)),
            station(6320, "Meetstation Lichteiland Goeree", "Noordzee"),
        ];
        store.replace_snapshot(&stations, &[]).unwrap();

        let matched = Analytics::new(&store).stations_matching_region("").unwrap();
        assert_eq!(ids(matched), vec![6320]);
    }

    #[test]
    fn test_latest_per_station_table() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let (stations, _) = sample_snapshot();
        let measurements = vec![
            measurement(0, 6260, 10, Some(30.0)),
            measurement(1, 6260, 12, Some(15.0)),
            measurement(2, 6310, 12, Some(20.0)),
            measurement(3, 6320, 12, None),
        ];
        store.replace_snapshot(&stations, &measurements).unwrap();

        let table = Analytics::new(&store).latest_per_station_table().unwrap();

        assert_eq!(
            ids(table.iter().map(|row| row.station.clone())),
            vec![6310, 6260, 6320]
        );
        assert_eq!(table[1].measurement, measurements[1]);
        assert_eq!(table[2].measurement.temperature, None);
    }

    #[test]
    fn test_latest_tie_goes_to_highest_measurement_id() {
        let TestStore { tmp: _tmp, mut store } =
            create_test_store().expect("Failed to create test store.");

        let stations = vec![station(6260, "Meetstation De Bilt", "Utrecht")];
        let mut undated = measurement(2, 6260, 12, Some(40.0));
        undated.timestamp = None;
        let measurements = vec![
            measurement(0, 6260, 12, Some(14.0)),
            measurement(1, 6260, 12, Some(16.0)),
            undated,
        ];
        store.replace_snapshot(&stations, &measurements).unwrap();

        let table = Analytics::new(&store).latest_per_station_table().unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].measurement.measurement_id, MeasurementId::from(1));
        assert_eq!(table[0].measurement.temperature, Some(16.0));
    }
}
