use std::path::Path;

use super::Store;

use crate::errors::SnapshotErr;

impl Store {
    const DB_FILE: &'static str = "stations.db";

    /// Initialize a new store, or open the one already at `root`.
    pub fn create(root: &dyn AsRef<Path>) -> Result<Self, SnapshotErr> {
        let db_file = root.as_ref().join(Store::DB_FILE);
        let root = root.as_ref().to_path_buf();

        std::fs::create_dir_all(&root)?;

        let db_conn = rusqlite::Connection::open_with_flags(
            db_file,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_CREATE,
        )?;

        let store = Store {
            root: Some(root),
            db_conn,
        };
        store.configure()?;
        store.initialize_schema()?;

        Ok(store)
    }

    /// Open an existing store.
    pub fn connect(root: &dyn AsRef<Path>) -> Result<Self, SnapshotErr> {
        let db_file = root.as_ref().join(Store::DB_FILE);
        let root = root.as_ref().to_path_buf();

        let db_conn = rusqlite::Connection::open_with_flags(
            db_file,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE,
        )?;

        Self::validate_db_structure(&db_conn)?;

        let store = Store {
            root: Some(root),
            db_conn,
        };
        store.configure()?;

        Ok(store)
    }

    /// A store that lives only as long as the returned value.
    pub fn open_in_memory() -> Result<Self, SnapshotErr> {
        let store = Store {
            root: None,
            db_conn: rusqlite::Connection::open_in_memory()?,
        };
        store.configure()?;
        store.initialize_schema()?;

        Ok(store)
    }

    /// Make sure both tables exist. Safe to call any number of times.
    pub fn initialize_schema(&self) -> Result<(), SnapshotErr> {
        self.db_conn
            .execute_batch(include_str!("root/create_schema.sql"))?;
        Ok(())
    }

    /// Retrieve a path to the root, if this store is on disk.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    // Cascading deletes and the orphan check on insert need this on every connection.
    fn configure(&self) -> Result<(), SnapshotErr> {
        self.db_conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    /// Validate the database structure is correct.
    fn validate_db_structure(db_conn: &rusqlite::Connection) -> Result<(), SnapshotErr> {
        let mut stmt = db_conn.prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;

        let names: Vec<String> = stmt
            .query_map(rusqlite::params![], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        if names != ["measurements", "stations"] {
            return Err(SnapshotErr::InvalidSchema);
        }

        Ok(())
    }
}
