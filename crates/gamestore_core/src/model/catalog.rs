//! Name-only catalog entities: platforms, genres and roles.
//!
//! Each is identified by its `name`, which is also its natural key.

use super::{require_non_empty, EntityKind, EntityValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
}

impl Platform {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_non_empty(EntityKind::Platform, "name", &self.name)
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "platform '{}'", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_non_empty(EntityKind::Genre, "name", &self.name)
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "genre '{}'", self.name)
    }
}

/// Named role referenced by users; privileges are assigned by `RolePolicy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_non_empty(EntityKind::Role, "name", &self.name)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "role '{}'", self.name)
    }
}

#[derive(Debug, Default)]
pub struct PlatformBuilder {
    platform: Platform,
}

impl PlatformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) -> &mut Self {
        self.platform = Platform::default();
        self
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.platform.name = name.into();
        self
    }

    pub fn build(&self) -> Platform {
        self.platform.clone()
    }
}

#[derive(Debug, Default)]
pub struct GenreBuilder {
    genre: Genre,
}

impl GenreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) -> &mut Self {
        self.genre = Genre::default();
        self
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.genre.name = name.into();
        self
    }

    pub fn build(&self) -> Genre {
        self.genre.clone()
    }
}
