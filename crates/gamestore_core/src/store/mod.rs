//! Entity store adapters: per-kind SQL for the generic DAO.
//!
//! # Responsibility
//! - Own every SQL statement that touches one entity table.
//! - Resolve name-based associations to store ids before writing.
//! - Map rows back into entities with associations as names.
//!
//! # Invariants
//! - Adapters never open transactions; the DAO wraps each write in one.
//! - `resolve` runs before any row is inserted or rewritten.
//! - Values always travel as bound parameters.

use crate::dao::{DaoError, DaoResult, IntegrityViolation};
use crate::model::{EntityKind, EntityValidationError, Stored};
use crate::query::Predicate;
use rusqlite::{Connection, OptionalExtension, Row};
use std::fmt::Display;

mod catalog;
mod game;
mod user;

pub use game::GameRefs;

/// SQL mapping for one entity kind.
pub trait EntityTable: Clone + Display + Sized {
    /// Ids (or other store keys) resolved from the entity's name references.
    type Refs;

    const KIND: EntityKind;
    const TABLE: &'static str;
    /// Columns callers may filter on.
    const COLUMNS: &'static [&'static str];
    /// Base SELECT; must project `id` first.
    const SELECT_SQL: &'static str;

    fn validate(&self) -> Result<(), EntityValidationError>;

    /// Equality predicates locating this entity's rows.
    fn natural_key(&self) -> Vec<Predicate>;

    /// Resolves association names; fails with an integrity error when one is unknown.
    fn resolve(&self, conn: &Connection) -> DaoResult<Self::Refs>;

    fn insert(&self, conn: &Connection, refs: &Self::Refs) -> DaoResult<i64>;

    /// Overwrites row `id` with this entity's fields.
    fn write(&self, conn: &Connection, id: i64, refs: &Self::Refs) -> DaoResult<()>;

    fn read_row(conn: &Connection, row: &Row<'_>) -> DaoResult<Stored<Self>>;
}

/// Deletes one row of `table` by id. Join rows follow via ON DELETE CASCADE.
pub(crate) fn delete_row(conn: &Connection, table: &'static str, id: i64) -> DaoResult<()> {
    conn.execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [id])?;
    Ok(())
}

/// Looks up the id of the lowest-numbered `table` row named `name`.
pub(crate) fn resolve_name(
    conn: &Connection,
    kind: EntityKind,
    table: &'static str,
    name: &str,
) -> DaoResult<i64> {
    conn.query_row(
        &format!("SELECT id FROM {table} WHERE name = ?1 ORDER BY id LIMIT 1;"),
        [name],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| {
        DaoError::Integrity(IntegrityViolation::UnresolvedReference {
            kind,
            name: name.to_string(),
        })
    })
}

/// Reads the `name` column of `table` row `id`.
pub(crate) fn name_by_id(conn: &Connection, table: &'static str, id: i64) -> DaoResult<String> {
    conn.query_row(
        &format!("SELECT name FROM {table} WHERE id = ?1;"),
        [id],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| DaoError::InvalidData(format!("dangling reference to {table}.id = {id}")))
}
