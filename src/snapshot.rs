//! Translation of a feed payload into the records kept in the store.

use crate::{
    errors::FetchError,
    feed::{FeedPayload, FeedRecord},
    measurement::{Measurement, MeasurementId},
    station::{Station, StationId},
};
use chrono::{DateTime, NaiveDateTime};
use log::{debug, warn};
use std::collections::HashMap;

/// Everything retrieved in one fetch, ready to replace the stored contents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Unique by station id.
    pub stations: Vec<Station>,
    /// Each refers to a station in `stations`.
    pub measurements: Vec<Measurement>,
}

impl Snapshot {
    /// Build a snapshot from the feed.
    ///
    /// Measurement ids are assigned from 0 in feed order. When a station id shows up more than
    /// once the last record's station attributes win, but every measurement is kept. A record
    /// without a station id makes the whole payload unusable.
    pub fn from_payload(payload: &FeedPayload) -> Result<Self, FetchError> {
        let mut stations: Vec<Station> = vec![];
        let mut positions: HashMap<StationId, usize> = HashMap::new();
        let mut measurements = Vec::with_capacity(payload.records().len());

        for (index, record) in payload.records().iter().enumerate() {
            let station_id = record
                .station_id
                .map(StationId::from)
                .ok_or(FetchError::MissingStationId { index })?;

            let station = Self::station_from_record(station_id, record);
            if let Some(&pos) = positions.get(&station_id) {
                debug!("Station {} repeated in feed, keeping the later record", station_id);
                stations[pos] = station;
            } else {
                positions.insert(station_id, stations.len());
                stations.push(station);
            }

            let measurement_id = MeasurementId::from(measurements.len() as u32);
            measurements.push(Self::measurement_from_record(
                measurement_id,
                station_id,
                record,
            ));
        }

        Ok(Snapshot {
            stations,
            measurements,
        })
    }

    /// True if there are no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    fn station_from_record(station_id: StationId, record: &FeedRecord) -> Station {
        Station {
            station_id,
            name: record.station_name.clone(),
            latitude: record.lat,
            longitude: record.lon,
            region: record.region.clone(),
        }
    }

    fn measurement_from_record(
        measurement_id: MeasurementId,
        station_id: StationId,
        record: &FeedRecord,
    ) -> Measurement {
        Measurement {
            measurement_id,
            station_id,
            timestamp: record.timestamp.as_deref().and_then(parse_timestamp),
            temperature: record.temperature,
            ground_temperature: record.ground_temperature,
            feel_temperature: record.feel_temperature,
            wind_gusts: record.wind_gusts,
            wind_speed_bft: record.wind_speed_bft,
            humidity: record.humidity,
            precipitation: record.precipitation,
            sun_power: record.sun_power,
        }
    }
}

// The feed sends local time without an offset, accept RFC 3339 in case that changes.
fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    text.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            warn!("Unparseable timestamp in feed, treated as missing: {:?}", text);
            None
        })
}

#[cfg(test)]
mod unit {
    use super::*;
    use chrono::NaiveDate;

    fn record(station_id: u32, name: &str, temperature: f64) -> FeedRecord {
        FeedRecord {
            station_id: Some(station_id),
            station_name: Some(name.to_owned()),
            timestamp: Some("2024-05-01T12:50:00".to_owned()),
            temperature: Some(temperature),
            ..FeedRecord::default()
        }
    }

    #[test]
    fn test_ids_assigned_in_feed_order() {
        let payload = FeedPayload::from_records(vec![
            record(6391, "Arcen", 18.4),
            record(6275, "Arnhem", 17.9),
        ]);
        let snapshot = Snapshot::from_payload(&payload).expect("Translation failed.");

        assert_eq!(snapshot.stations.len(), 2);
        assert_eq!(snapshot.measurements.len(), 2);
        assert_eq!(snapshot.measurements[0].measurement_id, MeasurementId::from(0));
        assert_eq!(snapshot.measurements[1].measurement_id, MeasurementId::from(1));
        assert_eq!(snapshot.measurements[1].station_id, StationId::new(6275));
        assert_eq!(
            snapshot.measurements[0].timestamp,
            Some(NaiveDate::from_ymd(2024, 5, 1).and_hms(12, 50, 0))
        );
    }

    #[test]
    fn test_duplicate_station_last_wins() {
        let payload = FeedPayload::from_records(vec![
            record(6391, "Old name", 18.4),
            record(6275, "Arnhem", 17.9),
            record(6391, "New name", 19.0),
        ]);
        let snapshot = Snapshot::from_payload(&payload).expect("Translation failed.");

        assert_eq!(snapshot.stations.len(), 2);
        assert_eq!(snapshot.stations[0].station_id, StationId::new(6391));
        assert_eq!(snapshot.stations[0].name.as_deref(), Some("New name"));
        assert_eq!(snapshot.measurements.len(), 3);
    }

    #[test]
    fn test_missing_station_id_is_fatal() {
        let mut bad = record(6391, "Arcen", 18.4);
        bad.station_id = None;
        let payload = FeedPayload::from_records(vec![record(6275, "Arnhem", 17.9), bad]);

        match Snapshot::from_payload(&payload) {
            Err(FetchError::MissingStationId { index: 1 }) => {}
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_tolerated() {
        let payload = FeedPayload::from_records(vec![FeedRecord {
            station_id: Some(6320),
            timestamp: Some("not a time".to_owned()),
            ..FeedRecord::default()
        }]);
        let snapshot = Snapshot::from_payload(&payload).expect("Translation failed.");

        assert_eq!(snapshot.stations[0], Station::new(StationId::new(6320)));
        assert_eq!(snapshot.measurements[0].timestamp, None);
        assert_eq!(snapshot.measurements[0].temperature, None);
    }

    #[test]
    fn test_empty_payload() {
        let snapshot = Snapshot::from_payload(&FeedPayload::default()).unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.measurements.is_empty());
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = NaiveDate::from_ymd(2024, 5, 1).and_hms(12, 50, 0);
        assert_eq!(parse_timestamp("2024-05-01T12:50:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:50:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("01-05-2024 12:50"), None);
    }

    #[test]
    fn test_unparseable_timestamp_keeps_measurement() {
        let payload = FeedPayload::from_records(vec![FeedRecord {
            station_id: Some(6260),
            timestamp: Some("01-05-2024 12:50".to_owned()),
            temperature: Some(15.0),
            ..FeedRecord::default()
        }]);
        let snapshot = Snapshot::from_payload(&payload).expect("Translation failed.");

        assert_eq!(snapshot.measurements.len(), 1);
        assert_eq!(snapshot.measurements[0].timestamp, None);
        assert_eq!(snapshot.measurements[0].temperature, Some(15.0));
    }
}
