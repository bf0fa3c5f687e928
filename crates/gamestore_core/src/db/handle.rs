//! Explicit store handle with a single-open/single-close lifecycle.
//!
//! # Invariants
//! - At most one live connection per handle.
//! - Opening over a live connection is rejected, never silently replaced.
//! - `scoped` releases the connection on every exit path.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;

/// Owned store handle passed explicitly to whoever needs the connection.
#[derive(Debug, Default)]
pub struct StoreHandle {
    conn: Option<Connection>,
}

impl StoreHandle {
    /// Creates a closed handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (and migrates) a file-backed database.
    ///
    /// # Errors
    /// - `DbError::AlreadyOpen` when the handle already holds a connection.
    pub fn open(&mut self, path: impl AsRef<Path>) -> DbResult<&Connection> {
        self.ensure_closed()?;
        Ok(&*self.conn.insert(open_db(path)?))
    }

    /// Opens (and migrates) an in-memory database.
    pub fn open_in_memory(&mut self) -> DbResult<&Connection> {
        self.ensure_closed()?;
        Ok(&*self.conn.insert(open_db_in_memory()?))
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Borrows the live connection.
    ///
    /// # Errors
    /// - `DbError::NotOpen` when the handle is closed.
    pub fn connection(&self) -> DbResult<&Connection> {
        self.conn.as_ref().ok_or(DbError::NotOpen)
    }

    /// Closes the live connection. Closing a closed handle is a no-op.
    pub fn close(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                // The failed connection is dropped here; the handle stays closed.
                warn!("event=db_close module=db status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Opens `path`, runs `work` against the connection and closes it again,
    /// whether `work` succeeded or not.
    pub fn scoped<T, E>(
        path: impl AsRef<Path>,
        work: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let mut handle = Self::new();
        let result = work(handle.open(path)?);
        let closed = handle.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    fn ensure_closed(&self) -> DbResult<()> {
        if self.conn.is_some() {
            warn!("event=db_open module=db status=rejected error_code=already_open");
            return Err(DbError::AlreadyOpen);
        }
        Ok(())
    }
}
