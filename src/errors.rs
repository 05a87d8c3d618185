//! Module for errors.
use thiserror::Error;

/// Error retrieving a snapshot from the upstream feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("network request failed for {url}")]
    Network {
        /// The requested URL
        url: String,
        /// Cause reported by the HTTP client
        #[source]
        source: reqwest::Error,
    },
    /// The request did not complete before the client timeout.
    #[error("request to {0} timed out")]
    Timeout(String),
    /// The feed answered with something other than 200 OK.
    #[error("HTTP request for {url} failed with status {status}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The status code returned by the server
        status: reqwest::StatusCode,
    },
    /// The body was not the expected JSON document.
    #[error("malformed feed payload")]
    MalformedPayload(#[from] serde_json::Error),
    /// A record in the feed had no station id.
    #[error("feed record {index} has no station id")]
    MissingStationId {
        /// Position of the record in the feed
        index: usize,
    },
}

/// Error from the snapshot store interface.
#[derive(Debug, Error)]
pub enum SnapshotErr {
    /// Error forwarded from the feed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Database error, a replace that failed here did not commit
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Error forwarded from std
    #[error("std lib io error: {0}")]
    IO(#[from] std::io::Error),

    /// The database structure is wrong.
    #[error("invalid store schema")]
    InvalidSchema,

    /// General error with any cause information erased and replaced by a string
    #[error("general error forwarded: {0}")]
    GeneralError(String),
}
