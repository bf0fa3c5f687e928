//! Catalog store plumbing: connections, schema versions and the store handle.
//!
//! Everything above this module works on a `&Connection` that already has
//! foreign keys enabled and the catalog schema at `migrations::latest_version()`.
//! `StoreHandle` is the only owner of a connection; DAOs borrow from it.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod handle;
pub mod migrations;
mod open;

pub use handle::StoreHandle;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening, migrating or holding the catalog store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The store's `user_version` is ahead of this build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Opening a store handle that already holds a live connection.
    AlreadyOpen,
    /// Using a store handle that has no live connection.
    NotOpen,
}

impl DbError {
    /// True for misuse of a `StoreHandle` lifecycle, as opposed to store failures.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::AlreadyOpen | Self::NotOpen)
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "catalog store error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema v{db_version} was written by a newer build (this build knows up to v{latest_supported})"
            ),
            Self::AlreadyOpen => write!(f, "store handle is already open"),
            Self::NotOpen => write!(f, "store handle is closed"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::AlreadyOpen | Self::NotOpen => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
