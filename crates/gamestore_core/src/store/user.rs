//! User adapter: `users` rows with the role stored as `role_id`.

use super::{name_by_id, resolve_name, EntityTable};
use crate::dao::DaoResult;
use crate::model::user::User;
use crate::model::{EntityKind, EntityValidationError, Stored};
use crate::query::Predicate;
use rusqlite::{params, Connection, Row};

impl EntityTable for User {
    /// Resolved `roles.id`.
    type Refs = i64;

    const KIND: EntityKind = EntityKind::User;
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "login", "phash", "role_id"];
    const SELECT_SQL: &'static str = "SELECT id, login, phash, role_id FROM users";

    fn validate(&self) -> Result<(), EntityValidationError> {
        User::validate(self)
    }

    fn natural_key(&self) -> Vec<Predicate> {
        vec![Predicate::eq("login", self.login.clone())]
    }

    fn resolve(&self, conn: &Connection) -> DaoResult<i64> {
        resolve_name(conn, EntityKind::Role, "roles", &self.role)
    }

    fn insert(&self, conn: &Connection, role_id: &i64) -> DaoResult<i64> {
        conn.execute(
            "INSERT INTO users (role_id, login, phash) VALUES (?1, ?2, ?3);",
            params![role_id, self.login.as_str(), self.credential_hash.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn write(&self, conn: &Connection, id: i64, role_id: &i64) -> DaoResult<()> {
        conn.execute(
            "UPDATE users SET role_id = ?1, login = ?2, phash = ?3 WHERE id = ?4;",
            params![
                role_id,
                self.login.as_str(),
                self.credential_hash.as_str(),
                id
            ],
        )?;
        Ok(())
    }

    fn read_row(conn: &Connection, row: &Row<'_>) -> DaoResult<Stored<Self>> {
        let role_id: i64 = row.get("role_id")?;
        Ok(Stored {
            id: row.get("id")?,
            entity: User {
                login: row.get("login")?,
                credential_hash: row.get("phash")?,
                role: name_by_id(conn, "roles", role_id)?,
            },
        })
    }
}
