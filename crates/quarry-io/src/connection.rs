//! Connection provider for source and sink databases.

use rusqlite::{Connection, OpenFlags};

use quarry_core::config::DatabaseConfig;

use crate::error::{IoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Sources are only ever queried.
    ReadOnly,
    /// Sinks append to tables that must already exist; the file is never created.
    ReadWrite,
}

pub fn open_database(db: &DatabaseConfig, access: Access) -> Result<Connection> {
    let mode = match access {
        Access::ReadOnly => OpenFlags::SQLITE_OPEN_READ_ONLY,
        Access::ReadWrite => OpenFlags::SQLITE_OPEN_READ_WRITE,
    };
    let flags = mode | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI;

    let conn = Connection::open_with_flags(&db.path, flags).map_err(|source| {
        IoError::Connection {
            path: db.path.clone(),
            source,
        }
    })?;
    tracing::info!(path = %db.path, ?access, "database connection established");
    Ok(conn)
}
