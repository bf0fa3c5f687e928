//! User entity and builder.
//!
//! # Invariants
//! - `login` is unique in the store (duplicate insert is an integrity error).
//! - `credential_hash` is the output of a `CredentialHasher`, never a raw secret.
//! - `role` names an existing role row.

use super::{require_non_empty, EntityKind, EntityValidationError};
use crate::access::credential::CredentialHasher;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub credential_hash: String,
    pub role: String,
}

impl User {
    pub fn new(
        login: impl Into<String>,
        credential_hash: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            login: login.into(),
            credential_hash: credential_hash.into(),
            role: role.into(),
        }
    }

    /// Creates a user whose credential hash is derived from `secret`.
    pub fn with_secret(
        login: impl Into<String>,
        secret: &str,
        role: impl Into<String>,
        hasher: &dyn CredentialHasher,
    ) -> Self {
        Self::new(login, hasher.hash(secret), role)
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_non_empty(EntityKind::User, "login", &self.login)?;
        require_non_empty(EntityKind::User, "credential_hash", &self.credential_hash)?;
        require_non_empty(EntityKind::User, "role", &self.role)
    }
}

// Keeps the hash out of debug output.
impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("login", &self.login)
            .field("credential_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "user '{}' ({})", self.login, self.role)
    }
}

#[derive(Debug, Default)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) -> &mut Self {
        self.user = User::default();
        self
    }

    pub fn login(&mut self, login: impl Into<String>) -> &mut Self {
        self.user.login = login.into();
        self
    }

    pub fn secret(&mut self, secret: &str, hasher: &dyn CredentialHasher) -> &mut Self {
        self.user.credential_hash = hasher.hash(secret);
        self
    }

    pub fn role(&mut self, role: impl Into<String>) -> &mut Self {
        self.user.role = role.into();
        self
    }

    pub fn build(&self) -> User {
        self.user.clone()
    }
}
