//! Undo history for one DAO.
//!
//! # Responsibility
//! - Capture the DAO's latest mutation record as an immutable memento.
//! - Roll back by re-applying the inverse of the newest reversible memento.
//!
//! # Invariants
//! - A history is bound to exactly one DAO, which it owns.
//! - Only mutations followed by `backup()` can be undone; intermediate
//!   mutations between two backups fold into the later one.
//! - `undo()` never surfaces reversal errors: it cascades to older mementos
//!   until one reverses or the stack is empty.

use crate::dao::{Dao, DaoError, DaoResult, MutationAction, MutationRecord};
use chrono::{DateTime, Local};
use log::{info, warn};
use std::fmt::Display;
use uuid::Uuid;

pub type MementoId = Uuid;

/// Immutable snapshot of one mutation record.
#[derive(Debug, Clone)]
pub struct Memento<E> {
    id: MementoId,
    record: Option<MutationRecord<E>>,
    captured_at: DateTime<Local>,
}

impl<E: Display> Memento<E> {
    fn capture(record: Option<MutationRecord<E>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            captured_at: Local::now(),
        }
    }

    pub fn id(&self) -> MementoId {
        self.id
    }

    pub fn record(&self) -> Option<&MutationRecord<E>> {
        self.record.as_ref()
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    /// Human-readable label, e.g. `update game 'a' (1.00) -> game 'b' (2.00)`.
    pub fn label(&self) -> String {
        match &self.record {
            Some(record) => record.to_string(),
            None => "no mutation".to_string(),
        }
    }
}

/// Read-only view of one memento for `show_history`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MementoSummary {
    pub id: MementoId,
    pub label: String,
    pub captured_at: DateTime<Local>,
}

impl Display for MementoSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.label, self.captured_at.format("%c"))
    }
}

/// Result of one `undo()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// `memento` was reversed after discarding `skipped` irreversible ones.
    Reverted { memento: MementoId, skipped: usize },
    /// The stack ran empty; `skipped` mementos were discarded on the way.
    Exhausted { skipped: usize },
}

impl UndoOutcome {
    pub fn is_reverted(&self) -> bool {
        matches!(self, Self::Reverted { .. })
    }
}

pub struct DaoHistory<D: Dao> {
    dao: D,
    mementos: Vec<Memento<D::Entity>>,
}

impl<D> DaoHistory<D>
where
    D: Dao,
    D::Entity: Display,
{
    pub fn new(dao: D) -> Self {
        Self {
            dao,
            mementos: Vec::new(),
        }
    }

    pub fn dao(&self) -> &D {
        &self.dao
    }

    pub fn dao_mut(&mut self) -> &mut D {
        &mut self.dao
    }

    /// Releases the DAO, discarding all mementos.
    pub fn into_inner(self) -> D {
        self.dao
    }

    pub fn len(&self) -> usize {
        self.mementos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty()
    }

    /// Pushes a memento of the DAO's current mutation record.
    pub fn backup(&mut self) -> MementoId {
        let memento = Memento::capture(self.dao.last_mutation().cloned());
        let id = memento.id;
        info!(
            "event=history_backup module=history status=ok kind={} depth={} label={}",
            self.dao.kind(),
            self.mementos.len() + 1,
            memento.label()
        );
        self.mementos.push(memento);
        id
    }

    /// Pops mementos newest-first until one reverses successfully.
    pub fn undo(&mut self) -> UndoOutcome {
        let mut skipped = 0;
        while let Some(memento) = self.mementos.pop() {
            match reverse(&mut self.dao, memento.record()) {
                Ok(()) => {
                    info!(
                        "event=history_undo module=history status=ok kind={} skipped={} label={}",
                        self.dao.kind(),
                        skipped,
                        memento.label()
                    );
                    return UndoOutcome::Reverted {
                        memento: memento.id,
                        skipped,
                    };
                }
                Err(err) => {
                    warn!(
                        "event=history_undo module=history status=skipped kind={} label={} error={}",
                        self.dao.kind(),
                        memento.label(),
                        err
                    );
                    skipped += 1;
                }
            }
        }
        UndoOutcome::Exhausted { skipped }
    }

    /// Lists captured mementos oldest-first. No side effects.
    pub fn show_history(&self) -> Vec<MementoSummary> {
        self.mementos
            .iter()
            .map(|memento| MementoSummary {
                id: memento.id,
                label: memento.label(),
                captured_at: memento.captured_at,
            })
            .collect()
    }
}

fn reverse<D: Dao>(dao: &mut D, record: Option<&MutationRecord<D::Entity>>) -> DaoResult<()> {
    match record {
        Some(MutationRecord::Updated { old, new }) => dao.update(new, old).map(|_| ()),
        Some(MutationRecord::Added { .. }) => {
            Err(DaoError::IrreversibleMutation(MutationAction::Add))
        }
        Some(MutationRecord::Removed { .. }) => {
            Err(DaoError::IrreversibleMutation(MutationAction::Remove))
        }
        None => Err(DaoError::NothingToReverse),
    }
}
