//! Catalog domain model.
//!
//! # Responsibility
//! - Define the plain entity values handled by the DAO layer.
//! - Keep associations human-readable (names), never surrogate ids.
//!
//! # Invariants
//! - Entities carry natural keys only; store identifiers live in `Stored`.
//! - `validate()` must pass before any entity is written.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catalog;
pub mod game;
pub mod user;

/// Tag naming one entity kind, used by the DAO factory and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Game,
    Platform,
    Genre,
    User,
    Role,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        Self::Game,
        Self::Platform,
        Self::Genre,
        Self::User,
        Self::Role,
    ];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Platform => "platform",
            Self::Genre => "genre",
            Self::User => "user",
            Self::Role => "role",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted row: store identifier plus the entity read back from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: i64,
    pub entity: T,
}

/// Entity-level validation failures raised before persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityValidationError {
    EmptyField {
        kind: EntityKind,
        field: &'static str,
    },
    InvalidPrice(f64),
}

impl Display for EntityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { kind, field } => {
                write!(f, "{kind}.{field} must not be empty")
            }
            Self::InvalidPrice(price) => {
                write!(f, "game price must be a finite non-negative number, got {price}")
            }
        }
    }
}

impl Error for EntityValidationError {}

pub(crate) fn require_non_empty(
    kind: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), EntityValidationError> {
    if value.trim().is_empty() {
        return Err(EntityValidationError::EmptyField { kind, field });
    }
    Ok(())
}
