#![deny(missing_docs)]
//! Keep a local snapshot of the Buienradar weather stations and answer questions about it.

//
// Public API
//
pub use analytics::{
    Analytics, LatestReading, Question, Report, StationTemperature, TemperatureGap,
    DEFAULT_REGION_MARKER,
};
pub use chart::{BarChart, ReportSink};
pub use cmd_line::CommonCmdLineArgs;
pub use errors::{FetchError, SnapshotErr};
pub use feed::{BuienradarFeed, FeedPayload, FeedRecord, SnapshotSource};
pub use measurement::{Measurement, MeasurementId};
pub use scheduler::{CycleOutcome, Scheduler, ShutdownHandle};
pub use snapshot::Snapshot;
pub use station::{Station, StationId};
pub use store::Store;

/// Default values for the refresh loop and the feed client.
pub mod defaults {
    pub use crate::feed::{DEFAULT_TIMEOUT, DEFAULT_URL};
    pub use crate::scheduler::{DEFAULT_INTERVAL, DEFAULT_POLL};
}

//
// Implementation only
//
mod analytics;
mod chart;
mod cmd_line;
mod errors;
mod feed;
mod measurement;
mod scheduler;
mod snapshot;
mod station;
mod store;
