//! Game adapter: `games` rows plus `game_platforms` / `game_genres` joins.

use super::{resolve_name, EntityTable};
use crate::dao::DaoResult;
use crate::model::game::Game;
use crate::model::{EntityKind, EntityValidationError, Stored};
use crate::query::Predicate;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;

const PLATFORM_LINK_SQL: &str =
    "INSERT OR IGNORE INTO game_platforms (game_id, platform_id) VALUES (?1, ?2);";
const GENRE_LINK_SQL: &str =
    "INSERT OR IGNORE INTO game_genres (game_id, genre_id) VALUES (?1, ?2);";

/// Platform and genre ids resolved from a game's association names.
#[derive(Debug, Default)]
pub struct GameRefs {
    platform_ids: Vec<i64>,
    genre_ids: Vec<i64>,
}

impl EntityTable for Game {
    type Refs = GameRefs;

    const KIND: EntityKind = EntityKind::Game;
    const TABLE: &'static str = "games";
    const COLUMNS: &'static [&'static str] = &["id", "name", "price"];
    const SELECT_SQL: &'static str = "SELECT id, name, price FROM games";

    fn validate(&self) -> Result<(), EntityValidationError> {
        Game::validate(self)
    }

    fn natural_key(&self) -> Vec<Predicate> {
        vec![
            Predicate::eq("name", self.name.clone()),
            Predicate::eq("price", self.price),
        ]
    }

    fn resolve(&self, conn: &Connection) -> DaoResult<GameRefs> {
        let platform_ids = self
            .platforms
            .iter()
            .map(|name| resolve_name(conn, EntityKind::Platform, "platforms", name))
            .collect::<DaoResult<Vec<_>>>()?;
        let genre_ids = self
            .genres
            .iter()
            .map(|name| resolve_name(conn, EntityKind::Genre, "genres", name))
            .collect::<DaoResult<Vec<_>>>()?;
        Ok(GameRefs {
            platform_ids,
            genre_ids,
        })
    }

    fn insert(&self, conn: &Connection, refs: &GameRefs) -> DaoResult<i64> {
        conn.execute(
            "INSERT INTO games (name, price) VALUES (?1, ?2);",
            params![self.name.as_str(), self.price],
        )?;
        let id = conn.last_insert_rowid();
        link(conn, PLATFORM_LINK_SQL, id, &refs.platform_ids)?;
        link(conn, GENRE_LINK_SQL, id, &refs.genre_ids)?;
        Ok(id)
    }

    /// Rewrites row `id` so it matches `self` exactly, links included.
    fn write(&self, conn: &Connection, id: i64, refs: &GameRefs) -> DaoResult<()> {
        conn.execute(
            "UPDATE games SET name = ?1, price = ?2 WHERE id = ?3;",
            params![self.name.as_str(), self.price, id],
        )?;
        conn.execute("DELETE FROM game_platforms WHERE game_id = ?1;", [id])?;
        conn.execute("DELETE FROM game_genres WHERE game_id = ?1;", [id])?;
        link(conn, PLATFORM_LINK_SQL, id, &refs.platform_ids)?;
        link(conn, GENRE_LINK_SQL, id, &refs.genre_ids)
    }

    fn read_row(conn: &Connection, row: &Row<'_>) -> DaoResult<Stored<Self>> {
        let id: i64 = row.get("id")?;
        Ok(Stored {
            id,
            entity: Game {
                name: row.get("name")?,
                price: row.get("price")?,
                platforms: load_names(
                    conn,
                    "SELECT p.name
                     FROM game_platforms gp
                     INNER JOIN platforms p ON p.id = gp.platform_id
                     WHERE gp.game_id = ?1;",
                    id,
                )?,
                genres: load_names(
                    conn,
                    "SELECT g.name
                     FROM game_genres gg
                     INNER JOIN genres g ON g.id = gg.genre_id
                     WHERE gg.game_id = ?1;",
                    id,
                )?,
            },
        })
    }
}

fn link(conn: &Connection, sql: &str, game_id: i64, target_ids: &[i64]) -> DaoResult<()> {
    let mut stmt = conn.prepare_cached(sql)?;
    for target_id in target_ids {
        stmt.execute(params![game_id, target_id])?;
    }
    Ok(())
}

fn load_names(conn: &Connection, sql: &str, game_id: i64) -> DaoResult<BTreeSet<String>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let mut rows = stmt.query([game_id])?;
    let mut names = BTreeSet::new();
    while let Some(row) = rows.next()? {
        names.insert(row.get(0)?);
    }
    Ok(names)
}
