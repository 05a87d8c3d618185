//! The local store holding the latest snapshot of stations and measurements.

use std::path::PathBuf;

/// The store.
#[derive(Debug)]
pub struct Store {
    root: Option<PathBuf>,         // The root directory, None when in memory.
    db_conn: rusqlite::Connection, // An sqlite connection.
}

mod query;
mod replace;
mod root;

impl Store {
    /// The connection, for read only queries elsewhere in the crate.
    pub(crate) fn conn(&self) -> &rusqlite::Connection {
        &self.db_conn
    }
}
