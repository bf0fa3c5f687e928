//! Data-access objects over the catalog store.
//!
//! # Responsibility
//! - Define the five-operation DAO contract shared by every entity kind.
//! - Record the latest successful mutation and fan it out to subscribers.
//! - Translate store failures into the semantic `DaoError` taxonomy.
//!
//! # Invariants
//! - Only successful mutations overwrite the mutation record.
//! - Subscribers are notified after commit, in attachment order.
//! - Multi-statement writes are atomic: a failure leaves no partial rows.

use crate::access::Privilege;
use crate::db::DbError;
use crate::model::{EntityKind, EntityValidationError, Stored};
use crate::query::{Predicate, QueryError};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod factory;
pub mod mutation;
pub mod notify;
mod sqlite;

pub use factory::{dao_for, CatalogDao};
pub use mutation::{MutationAction, MutationRecord};
pub use notify::{LoggingSubscriber, NotificationHub, Subscriber, SubscriberError};
pub use sqlite::SqliteDao;

pub type DaoResult<T> = Result<T, DaoError>;

/// Five-operation data-access contract for one entity kind.
///
/// Access-controlled wrappers implement the same trait, so callers cannot
/// tell a gateway from a plain DAO.
pub trait Dao {
    type Entity: Clone;

    fn kind(&self) -> EntityKind;

    /// Returns every row, in store order.
    fn get_all(&self) -> DaoResult<Vec<Stored<Self::Entity>>>;

    /// Returns rows matching the conjunction of `predicates`.
    ///
    /// An empty predicate list behaves exactly like `get_all`.
    fn filter(&self, predicates: &[Predicate]) -> DaoResult<Vec<Stored<Self::Entity>>>;

    /// Inserts `entity` and returns its store identifier.
    fn add(&mut self, entity: &Self::Entity) -> DaoResult<i64>;

    /// Deletes every row sharing `entity`'s natural key; returns the count.
    ///
    /// Zero matches is not an error.
    fn remove(&mut self, entity: &Self::Entity) -> DaoResult<usize>;

    /// Rewrites every row sharing `old`'s natural key with `new`'s fields;
    /// returns the count.
    fn update(&mut self, old: &Self::Entity, new: &Self::Entity) -> DaoResult<usize>;

    /// Latest successful mutation, if any.
    fn last_mutation(&self) -> Option<&MutationRecord<Self::Entity>>;

    fn attach(&mut self, subscriber: Arc<dyn Subscriber<Self::Entity>>);

    /// Removes the first attachment of `subscriber`; returns whether one was found.
    fn detach(&mut self, subscriber: &Arc<dyn Subscriber<Self::Entity>>) -> bool;
}

/// Adds each entity in order; stops at the first failure.
pub fn add_all<D: Dao>(dao: &mut D, entities: &[D::Entity]) -> DaoResult<Vec<i64>> {
    entities.iter().map(|entity| dao.add(entity)).collect()
}

/// Removes each entity in order; returns the total number of deleted rows.
pub fn remove_all<D: Dao>(dao: &mut D, entities: &[D::Entity]) -> DaoResult<usize> {
    let mut removed = 0;
    for entity in entities {
        removed += dao.remove(entity)?;
    }
    Ok(removed)
}

/// Referential/uniqueness failures surfaced as `DaoError::Integrity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// A platform/genre/role name did not match any stored row.
    UnresolvedReference { kind: EntityKind, name: String },
    /// The store rejected a write (unique login, foreign key, check).
    Constraint(String),
}

impl Display for IntegrityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnresolvedReference { kind, name } => {
                write!(f, "{kind} `{name}` does not exist")
            }
            Self::Constraint(message) => write!(f, "constraint violated: {message}"),
        }
    }
}

#[derive(Debug)]
pub enum DaoError {
    Validation(EntityValidationError),
    Query(QueryError),
    Db(DbError),
    Integrity(IntegrityViolation),
    InvalidData(String),
    Subscriber(SubscriberError),
    /// Mutation attempted through a gateway with no session.
    Unauthenticated,
    /// Session role lacks the privilege the operation requires.
    Unauthorized {
        role: String,
        required: Privilege,
    },
    /// Reversal requested for a mutation kind that has no inverse.
    IrreversibleMutation(MutationAction),
    /// Reversal requested for a memento captured before any mutation.
    NothingToReverse,
}

impl DaoError {
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Unauthorized { .. })
    }
}

impl Display for DaoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Integrity(violation) => write!(f, "integrity error: {violation}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Subscriber(err) => write!(f, "{err}"),
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::Unauthorized { role, required } => {
                write!(f, "role `{role}` lacks {} privilege", required.as_str())
            }
            Self::IrreversibleMutation(action) => {
                write!(f, "reversing a `{}` mutation is not supported", action.as_str())
            }
            Self::NothingToReverse => write!(f, "memento holds no mutation"),
        }
    }
}

impl Error for DaoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Subscriber(err) => Some(err),
            Self::Integrity(_)
            | Self::InvalidData(_)
            | Self::Unauthenticated
            | Self::Unauthorized { .. }
            | Self::IrreversibleMutation(_)
            | Self::NothingToReverse => None,
        }
    }
}

impl From<EntityValidationError> for DaoError {
    fn from(value: EntityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<QueryError> for DaoError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<DbError> for DaoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::Db(other),
        }
    }
}

impl From<SubscriberError> for DaoError {
    fn from(value: SubscriberError) -> Self {
        Self::Subscriber(value)
    }
}

impl From<rusqlite::Error> for DaoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            return Self::Integrity(IntegrityViolation::Constraint(value.to_string()));
        }
        Self::Db(DbError::Sqlite(value))
    }
}
