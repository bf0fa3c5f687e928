//! Kind-tagged DAO construction.

use super::sqlite::SqliteDao;
use super::{Dao, DaoResult};
use crate::model::catalog::{Genre, Platform, Role};
use crate::model::game::Game;
use crate::model::user::User;
use crate::model::EntityKind;
use rusqlite::Connection;

/// One DAO of any entity kind, selected at runtime by `dao_for`.
pub enum CatalogDao<'conn> {
    Game(SqliteDao<'conn, Game>),
    Platform(SqliteDao<'conn, Platform>),
    Genre(SqliteDao<'conn, Genre>),
    User(SqliteDao<'conn, User>),
    Role(SqliteDao<'conn, Role>),
}

impl CatalogDao<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Game(dao) => dao.kind(),
            Self::Platform(dao) => dao.kind(),
            Self::Genre(dao) => dao.kind(),
            Self::User(dao) => dao.kind(),
            Self::Role(dao) => dao.kind(),
        }
    }

    /// Number of stored rows of this kind.
    pub fn count(&self) -> DaoResult<usize> {
        Ok(match self {
            Self::Game(dao) => dao.get_all()?.len(),
            Self::Platform(dao) => dao.get_all()?.len(),
            Self::Genre(dao) => dao.get_all()?.len(),
            Self::User(dao) => dao.get_all()?.len(),
            Self::Role(dao) => dao.get_all()?.len(),
        })
    }
}

/// Builds a fresh DAO (own mutation record, own subscriber list) for `kind`.
pub fn dao_for(kind: EntityKind, conn: &Connection) -> CatalogDao<'_> {
    match kind {
        EntityKind::Game => CatalogDao::Game(SqliteDao::new(conn)),
        EntityKind::Platform => CatalogDao::Platform(SqliteDao::new(conn)),
        EntityKind::Genre => CatalogDao::Genre(SqliteDao::new(conn)),
        EntityKind::User => CatalogDao::User(SqliteDao::new(conn)),
        EntityKind::Role => CatalogDao::Role(SqliteDao::new(conn)),
    }
}
