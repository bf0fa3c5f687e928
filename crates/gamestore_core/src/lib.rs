//! Access-controlled, observable, undoable data access for the game catalog.
//! This crate owns the catalog's business invariants; callers only see DAOs.

pub mod access;
pub mod config;
pub mod dao;
pub mod db;
pub mod history;
pub mod logging;
pub mod model;
pub mod query;
pub mod store;

pub use access::credential::{CredentialHasher, Sha256Hasher};
pub use access::{AccessGateway, Privilege, RolePolicy, SessionState, UserDirectory};
pub use config::{ConfigError, CoreConfig};
pub use dao::{
    add_all, dao_for, remove_all, CatalogDao, Dao, DaoError, DaoResult, IntegrityViolation,
    LoggingSubscriber, MutationAction, MutationRecord, NotificationHub, SqliteDao, Subscriber,
    SubscriberError,
};
pub use db::{open_db, open_db_in_memory, DbError, DbResult, StoreHandle};
pub use history::{DaoHistory, Memento, MementoId, MementoSummary, UndoOutcome};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::catalog::{Genre, GenreBuilder, Platform, PlatformBuilder, Role};
pub use model::game::{Game, GameBuilder};
pub use model::user::{User, UserBuilder};
pub use model::{EntityKind, EntityValidationError, Stored};
pub use query::{compile, CompiledQuery, Operator, Predicate, QueryError};
pub use store::EntityTable;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
