//! Adapters for the name-only tables: platforms, genres, roles.

use super::EntityTable;
use crate::dao::DaoResult;
use crate::model::catalog::{Genre, Platform, Role};
use crate::model::{EntityKind, EntityValidationError, Stored};
use crate::query::Predicate;
use rusqlite::{Connection, Row};

fn insert_named(conn: &Connection, table: &'static str, name: &str) -> DaoResult<i64> {
    conn.execute(&format!("INSERT INTO {table} (name) VALUES (?1);"), [name])?;
    Ok(conn.last_insert_rowid())
}

fn rename(conn: &Connection, table: &'static str, id: i64, name: &str) -> DaoResult<()> {
    conn.execute(
        &format!("UPDATE {table} SET name = ?1 WHERE id = ?2;"),
        rusqlite::params![name, id],
    )?;
    Ok(())
}

impl EntityTable for Platform {
    type Refs = ();

    const KIND: EntityKind = EntityKind::Platform;
    const TABLE: &'static str = "platforms";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const SELECT_SQL: &'static str = "SELECT id, name FROM platforms";

    fn validate(&self) -> Result<(), EntityValidationError> {
        Platform::validate(self)
    }

    fn natural_key(&self) -> Vec<Predicate> {
        vec![Predicate::eq("name", self.name.clone())]
    }

    fn resolve(&self, _conn: &Connection) -> DaoResult<()> {
        Ok(())
    }

    fn insert(&self, conn: &Connection, _refs: &()) -> DaoResult<i64> {
        insert_named(conn, Self::TABLE, &self.name)
    }

    fn write(&self, conn: &Connection, id: i64, _refs: &()) -> DaoResult<()> {
        rename(conn, Self::TABLE, id, &self.name)
    }

    fn read_row(_conn: &Connection, row: &Row<'_>) -> DaoResult<Stored<Self>> {
        Ok(Stored {
            id: row.get("id")?,
            entity: Platform::new(row.get::<_, String>("name")?),
        })
    }
}

impl EntityTable for Genre {
    type Refs = ();

    const KIND: EntityKind = EntityKind::Genre;
    const TABLE: &'static str = "genres";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const SELECT_SQL: &'static str = "SELECT id, name FROM genres";

    fn validate(&self) -> Result<(), EntityValidationError> {
        Genre::validate(self)
    }

    fn natural_key(&self) -> Vec<Predicate> {
        vec![Predicate::eq("name", self.name.clone())]
    }

    fn resolve(&self, _conn: &Connection) -> DaoResult<()> {
        Ok(())
    }

    fn insert(&self, conn: &Connection, _refs: &()) -> DaoResult<i64> {
        insert_named(conn, Self::TABLE, &self.name)
    }

    fn write(&self, conn: &Connection, id: i64, _refs: &()) -> DaoResult<()> {
        rename(conn, Self::TABLE, id, &self.name)
    }

    fn read_row(_conn: &Connection, row: &Row<'_>) -> DaoResult<Stored<Self>> {
        Ok(Stored {
            id: row.get("id")?,
            entity: Genre::new(row.get::<_, String>("name")?),
        })
    }
}

impl EntityTable for Role {
    type Refs = ();

    const KIND: EntityKind = EntityKind::Role;
    const TABLE: &'static str = "roles";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const SELECT_SQL: &'static str = "SELECT id, name FROM roles";

    fn validate(&self) -> Result<(), EntityValidationError> {
        Role::validate(self)
    }

    fn natural_key(&self) -> Vec<Predicate> {
        vec![Predicate::eq("name", self.name.clone())]
    }

    fn resolve(&self, _conn: &Connection) -> DaoResult<()> {
        Ok(())
    }

    fn insert(&self, conn: &Connection, _refs: &()) -> DaoResult<i64> {
        insert_named(conn, Self::TABLE, &self.name)
    }

    fn write(&self, conn: &Connection, id: i64, _refs: &()) -> DaoResult<()> {
        rename(conn, Self::TABLE, id, &self.name)
    }

    fn read_row(_conn: &Connection, row: &Row<'_>) -> DaoResult<Stored<Self>> {
        Ok(Stored {
            id: row.get("id")?,
            entity: Role::new(row.get::<_, String>("name")?),
        })
    }
}
