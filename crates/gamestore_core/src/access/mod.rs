//! Role-based access control for DAOs.
//!
//! # Responsibility
//! - Map role names to privilege levels.
//! - Track gateway authentication state.
//! - Gate DAO operations before they reach the store.
//!
//! # Invariants
//! - Reads need at least `Privilege::Read`; writes need `Privilege::Full`.
//! - Denied calls never reach the wrapped DAO.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod credential;
mod gateway;

pub use gateway::{AccessGateway, UserDirectory};

/// Ordered privilege levels; `Full` implies `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    Read,
    Full,
}

impl Privilege {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Full => "full",
        }
    }
}

/// Closed role → privilege table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolePolicy {
    grants: BTreeMap<String, Privilege>,
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::from_grants([("admin", Privilege::Full), ("user", Privilege::Read)])
    }
}

impl RolePolicy {
    /// Policy that recognizes no role at all.
    pub fn empty() -> Self {
        Self {
            grants: BTreeMap::new(),
        }
    }

    pub fn from_grants<I, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = (S, Privilege)>,
        S: Into<String>,
    {
        Self {
            grants: grants
                .into_iter()
                .map(|(role, privilege)| (role.into(), privilege))
                .collect(),
        }
    }

    pub fn grant(&mut self, role: impl Into<String>, privilege: Privilege) -> &mut Self {
        self.grants.insert(role.into(), privilege);
        self
    }

    /// Privilege for `role`, or `None` when the role is not recognized.
    pub fn privilege_of(&self, role: &str) -> Option<Privilege> {
        self.grants.get(role).copied()
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, Privilege)> {
        self.grants
            .iter()
            .map(|(role, privilege)| (role.as_str(), *privilege))
    }
}

/// Gateway authentication state. There is no logout; `login` overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated {
        login: String,
        role: String,
        /// `None` when the role is absent from the policy.
        privilege: Option<Privilege>,
    },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn privilege(&self) -> Option<Privilege> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { privilege, .. } => *privilege,
        }
    }

    pub fn allows(&self, required: Privilege) -> bool {
        self.privilege().is_some_and(|granted| granted >= required)
    }
}
