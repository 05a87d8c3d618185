//! Weather stations reported by the feed.

mod station_id;

pub use station_id::StationId;

/// Description of a weather station.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Station {
    /// Id as assigned by the feed, stable between snapshots.
    pub station_id: StationId,
    /// Common name, e.g. "Meetstation Vlissingen"
    pub name: Option<String>,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// Free text region, e.g. "Noordzee" or "Vlissingen"
    pub region: Option<String>,
}

impl Station {
    /// Create a station with only an id.
    pub fn new(station_id: StationId) -> Self {
        Station {
            station_id,
            ..Station::default()
        }
    }

    /// Name to show in reports, falls back to the id.
    pub fn display_name(&self) -> String {
        match self.name {
            Some(ref name) => name.clone(),
            None => format!("station {}", self.station_id),
        }
    }
}
