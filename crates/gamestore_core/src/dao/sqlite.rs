//! Generic SQLite-backed DAO.
//!
//! # Invariants
//! - Every write runs in one transaction; errors drop it (rollback).
//! - remove/update locate rows by natural key, so rows sharing a key are
//!   affected together.
//! - The mutation record is written and subscribers notified only after commit.
//! - An update records the row it overwrote, associations included, as `old`.

use super::mutation::MutationRecord;
use super::notify::{NotificationHub, Subscriber};
use super::{Dao, DaoResult};
use crate::model::{EntityKind, Stored};
use crate::query::{compile, Predicate, QueryError};
use crate::store::{delete_row, EntityTable};
use log::{debug, info};
use rusqlite::Connection;
use std::sync::Arc;

/// DAO for entity kind `T` over a borrowed, migrated connection.
pub struct SqliteDao<'conn, T: EntityTable> {
    conn: &'conn Connection,
    last_mutation: Option<MutationRecord<T>>,
    hub: NotificationHub<T>,
}

impl<'conn, T: EntityTable> SqliteDao<'conn, T> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            last_mutation: None,
            hub: NotificationHub::new(),
        }
    }

    /// Creates a DAO with one subscriber already attached.
    pub fn with_subscriber(conn: &'conn Connection, subscriber: Arc<dyn Subscriber<T>>) -> Self {
        let mut dao = Self::new(conn);
        dao.hub.attach(subscriber);
        dao
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    pub fn subscriber_count(&self) -> usize {
        self.hub.len()
    }

    fn select(&self, conn: &Connection, predicates: &[Predicate]) -> DaoResult<Vec<Stored<T>>> {
        for predicate in predicates {
            if !T::COLUMNS.contains(&predicate.column.as_str()) {
                return Err(QueryError::UnknownColumn {
                    table: T::TABLE,
                    column: predicate.column.clone(),
                }
                .into());
            }
        }

        let compiled = compile(T::SELECT_SQL, predicates)?;
        let params = compiled.named_params();
        let mut stmt = conn.prepare(&compiled.sql)?;
        let mut rows = stmt.query(params.as_slice())?;
        let mut found = Vec::new();
        while let Some(row) = rows.next()? {
            found.push(T::read_row(conn, row)?);
        }
        Ok(found)
    }

    fn matching_ids(&self, conn: &Connection, entity: &T) -> DaoResult<Vec<i64>> {
        Ok(self
            .select(conn, &entity.natural_key())?
            .into_iter()
            .map(|stored| stored.id)
            .collect())
    }

    fn record(&mut self, record: MutationRecord<T>) -> DaoResult<()> {
        info!(
            "event=dao_write module=dao status=ok kind={} action={}",
            T::KIND,
            record.action().as_str()
        );
        let record = self.last_mutation.insert(record);
        self.hub.notify(T::KIND, record)?;
        Ok(())
    }
}

impl<T: EntityTable> Dao for SqliteDao<'_, T> {
    type Entity = T;

    fn kind(&self) -> EntityKind {
        T::KIND
    }

    fn get_all(&self) -> DaoResult<Vec<Stored<T>>> {
        self.filter(&[])
    }

    fn filter(&self, predicates: &[Predicate]) -> DaoResult<Vec<Stored<T>>> {
        let rows = self.select(self.conn, predicates)?;
        debug!(
            "event=dao_read module=dao status=ok kind={} predicates={} rows={}",
            T::KIND,
            predicates.len(),
            rows.len()
        );
        Ok(rows)
    }

    fn add(&mut self, entity: &T) -> DaoResult<i64> {
        entity.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let refs = entity.resolve(&tx)?;
        let id = entity.insert(&tx, &refs)?;
        tx.commit()?;

        self.record(MutationRecord::Added {
            object: entity.clone(),
        })?;
        Ok(id)
    }

    fn remove(&mut self, entity: &T) -> DaoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = self.matching_ids(&tx, entity)?;
        for id in &ids {
            delete_row(&tx, T::TABLE, *id)?;
        }
        tx.commit()?;

        self.record(MutationRecord::Removed {
            object: entity.clone(),
        })?;
        Ok(ids.len())
    }

    fn update(&mut self, old: &T, new: &T) -> DaoResult<usize> {
        new.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let refs = new.resolve(&tx)?;
        let overwritten = self.select(&tx, &old.natural_key())?;
        for stored in &overwritten {
            new.write(&tx, stored.id, &refs)?;
        }
        tx.commit()?;

        let updated = overwritten.len();
        // The first overwritten row, as stored, is what a reversal restores.
        let previous = overwritten
            .into_iter()
            .next()
            .map_or_else(|| old.clone(), |stored| stored.entity);
        self.record(MutationRecord::Updated {
            old: previous,
            new: new.clone(),
        })?;
        Ok(updated)
    }

    fn last_mutation(&self) -> Option<&MutationRecord<T>> {
        self.last_mutation.as_ref()
    }

    fn attach(&mut self, subscriber: Arc<dyn Subscriber<T>>) {
        self.hub.attach(subscriber);
    }

    fn detach(&mut self, subscriber: &Arc<dyn Subscriber<T>>) -> bool {
        self.hub.detach(subscriber)
    }
}
