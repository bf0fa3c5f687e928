//! Mutation records written by DAOs after each successful write.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    Add,
    Remove,
    Update,
}

impl MutationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
        }
    }
}

/// The latest add/remove/update performed by one DAO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MutationRecord<E> {
    Added { object: E },
    Removed { object: E },
    Updated { old: E, new: E },
}

impl<E> MutationRecord<E> {
    pub fn action(&self) -> MutationAction {
        match self {
            Self::Added { .. } => MutationAction::Add,
            Self::Removed { .. } => MutationAction::Remove,
            Self::Updated { .. } => MutationAction::Update,
        }
    }
}

impl<E: Display> Display for MutationRecord<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added { object } => write!(f, "add {object}"),
            Self::Removed { object } => write!(f, "remove {object}"),
            Self::Updated { old, new } => write!(f, "update {old} -> {new}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MutationAction, MutationRecord};
    use crate::model::catalog::Platform;

    #[test]
    fn labels_name_action_and_subjects() {
        let record = MutationRecord::Updated {
            old: Platform::new("pc"),
            new: Platform::new("switch"),
        };
        assert_eq!(record.action(), MutationAction::Update);
        assert_eq!(
            record.to_string(),
            "update platform 'pc' -> platform 'switch'"
        );

        let added = MutationRecord::Added {
            object: Platform::new("x"),
        };
        assert_eq!(added.to_string(), "add platform 'x'");
    }
}
