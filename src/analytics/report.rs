use std::fmt::{self, Display};

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use super::{Analytics, LatestReading, StationTemperature, TemperatureGap};

use crate::{errors::SnapshotErr, station::Station, store::Store};

/// Region marker used for the stations at sea.
pub const DEFAULT_REGION_MARKER: &str = "Noordzee";

/// The questions answered after every refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
pub enum Question {
    /// Which stations are the warmest right now?
    #[strum(serialize = "highest")]
    HighestTemperature,
    /// What is the average temperature?
    #[strum(serialize = "average")]
    AverageTemperature,
    /// Where does the felt temperature differ most from the actual one?
    #[strum(serialize = "feel-gap")]
    FeelGap,
    /// Which stations are in the configured region?
    #[strum(serialize = "region")]
    Region,
}

/// Answers to all questions for one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    /// All stations tied for the highest temperature.
    pub highest: Vec<StationTemperature>,
    /// `None` when no measurement has a temperature.
    pub average: Option<f64>,
    /// `None` when no measurement has both temperatures.
    pub largest_gap: Option<TemperatureGap>,
    /// The marker `in_region` was selected with.
    pub region_marker: String,
    /// Stations whose region contains `region_marker`.
    pub in_region: Vec<Station>,
    /// Latest measurement per station, warmest first.
    pub latest: Vec<LatestReading>,
}

impl Report {
    /// Run every query against the current contents of `store`.
    pub fn compute(store: &Store, region_marker: &str) -> Result<Self, SnapshotErr> {
        let analytics = Analytics::new(store);

        Ok(Report {
            highest: analytics.highest_temperature_stations()?,
            average: analytics.average_temperature()?,
            largest_gap: analytics.largest_feel_vs_actual_gap()?,
            region_marker: region_marker.to_owned(),
            in_region: analytics.stations_matching_region(region_marker)?,
            latest: analytics.latest_per_station_table()?,
        })
    }

    /// Human readable answer to one question.
    pub fn answer(&self, question: Question) -> String {
        match question {
            Question::HighestTemperature => self.highest_answer(),
            Question::AverageTemperature => self.average_answer(),
            Question::FeelGap => self.feel_gap_answer(),
            Question::Region => self.region_answer(),
        }
    }

    fn highest_answer(&self) -> String {
        if self.highest.is_empty() {
            return "No station reported a temperature.".to_owned();
        }

        self.highest
            .iter()
            .map(|StationTemperature { station, temperature }| {
                format!(
                    "The highest temperature is {:.1} °C in {} with station id {}.",
                    temperature,
                    station.display_name(),
                    station.station_id
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn average_answer(&self) -> String {
        match self.average {
            Some(avg) => format!("The average temperature is {:.2} °C.", avg),
            None => "No temperatures in this snapshot, there is no average.".to_owned(),
        }
    }

    fn feel_gap_answer(&self) -> String {
        match self.largest_gap {
            Some(TemperatureGap {
                ref station, gap, ..
            }) => format!(
                "The largest difference between felt and actual temperature is {:.1} °C in {} \
                 with station id {}.",
                gap,
                station.display_name(),
                station.station_id
            ),
            None => "No measurement has both a felt and an actual temperature.".to_owned(),
        }
    }

    fn region_answer(&self) -> String {
        if self.in_region.is_empty() {
            return format!("No stations in region \"{}\".", self.region_marker);
        }

        let mut text = format!("Stations in region \"{}\":", self.region_marker);
        for station in &self.in_region {
            text.push_str(&format!(
                "\n  {} with station id {}",
                station.display_name(),
                station.station_id
            ));
        }
        text
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for question in Question::iter() {
            writeln!(f, "{}", self.answer(question))?;
        }
        Ok(())
    }
}
