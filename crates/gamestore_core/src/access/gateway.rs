//! Access-controlled DAO wrapper.
//!
//! # Invariants
//! - The gateway exposes the plain `Dao` contract.
//! - Anonymous or under-privileged reads return empty results, not errors.
//! - Anonymous writes fail with `Unauthenticated`; under-privileged writes
//!   with `Unauthorized`. Neither reaches the wrapped DAO.
//! - A failed `login` always leaves the gateway anonymous.

use super::credential::{CredentialHasher, Sha256Hasher};
use super::{Privilege, RolePolicy, SessionState};
use crate::dao::{Dao, DaoError, DaoResult, MutationRecord, SqliteDao, Subscriber};
use crate::model::user::User;
use crate::model::{EntityKind, Stored};
use crate::query::Predicate;
use log::{error, info, warn};
use std::sync::Arc;

/// Source of user rows for `login`.
pub trait UserDirectory {
    fn find_by_login(&self, login: &str) -> DaoResult<Vec<User>>;
}

impl UserDirectory for SqliteDao<'_, User> {
    fn find_by_login(&self, login: &str) -> DaoResult<Vec<User>> {
        Ok(self
            .filter(&[Predicate::eq("login", login.to_string())])?
            .into_iter()
            .map(|stored| stored.entity)
            .collect())
    }
}

impl<T: UserDirectory + ?Sized> UserDirectory for &T {
    fn find_by_login(&self, login: &str) -> DaoResult<Vec<User>> {
        (**self).find_by_login(login)
    }
}

pub struct AccessGateway<D, U> {
    inner: D,
    users: U,
    policy: RolePolicy,
    hasher: Box<dyn CredentialHasher>,
    session: SessionState,
}

impl<D: Dao, U: UserDirectory> AccessGateway<D, U> {
    /// Wraps `inner` with the default role policy and SHA-256 credentials.
    pub fn new(inner: D, users: U) -> Self {
        Self {
            inner,
            users,
            policy: RolePolicy::default(),
            hasher: Box::new(Sha256Hasher),
            session: SessionState::Anonymous,
        }
    }

    pub fn with_policy(mut self, policy: RolePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hasher(mut self, hasher: impl CredentialHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    /// Wrapped DAO, for inspection. Bypasses access checks.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    /// Authenticates `login` with `secret`.
    ///
    /// Returns `Ok(true)` and binds the session on success. Unknown login,
    /// wrong secret or an ambiguous login return `Ok(false)` and reset the
    /// session to anonymous. Store failures propagate and also reset it.
    pub fn login(&mut self, login: &str, secret: &str) -> DaoResult<bool> {
        self.session = SessionState::Anonymous;

        let mut candidates = self.users.find_by_login(login)?;
        if candidates.len() > 1 {
            error!(
                "event=gateway_login module=access status=error kind={} error_code=ambiguous_login matches={}",
                self.inner.kind(),
                candidates.len()
            );
            return Ok(false);
        }
        let Some(user) = candidates.pop() else {
            warn!(
                "event=gateway_login module=access status=denied kind={} reason=unknown_login",
                self.inner.kind()
            );
            return Ok(false);
        };

        if !self.hasher.verify(secret, &user.credential_hash) {
            warn!(
                "event=gateway_login module=access status=denied kind={} reason=bad_credentials",
                self.inner.kind()
            );
            return Ok(false);
        }

        let privilege = self.policy.privilege_of(&user.role);
        info!(
            "event=gateway_login module=access status=ok kind={} role={} privilege={}",
            self.inner.kind(),
            user.role,
            privilege.map_or("none", Privilege::as_str)
        );
        self.session = SessionState::Authenticated {
            login: user.login,
            role: user.role,
            privilege,
        };
        Ok(true)
    }

    fn can_read(&self, operation: &'static str) -> bool {
        if self.session.allows(Privilege::Read) {
            return true;
        }
        warn!(
            "event=access_denied module=access status=degraded kind={} operation={operation}",
            self.inner.kind()
        );
        false
    }

    fn authorize_write(&self, operation: &'static str) -> DaoResult<()> {
        if self.session.allows(Privilege::Full) {
            return Ok(());
        }
        let denial = match &self.session {
            SessionState::Anonymous => DaoError::Unauthenticated,
            SessionState::Authenticated { role, .. } => DaoError::Unauthorized {
                role: role.clone(),
                required: Privilege::Full,
            },
        };
        warn!(
            "event=access_denied module=access status=denied kind={} operation={operation} error={denial}",
            self.inner.kind()
        );
        Err(denial)
    }
}

impl<D: Dao, U: UserDirectory> Dao for AccessGateway<D, U> {
    type Entity = D::Entity;

    fn kind(&self) -> EntityKind {
        self.inner.kind()
    }

    fn get_all(&self) -> DaoResult<Vec<Stored<D::Entity>>> {
        if !self.can_read("get_all") {
            return Ok(Vec::new());
        }
        self.inner.get_all()
    }

    fn filter(&self, predicates: &[Predicate]) -> DaoResult<Vec<Stored<D::Entity>>> {
        if !self.can_read("filter") {
            return Ok(Vec::new());
        }
        self.inner.filter(predicates)
    }

    fn add(&mut self, entity: &D::Entity) -> DaoResult<i64> {
        self.authorize_write("add")?;
        self.inner.add(entity)
    }

    fn remove(&mut self, entity: &D::Entity) -> DaoResult<usize> {
        self.authorize_write("remove")?;
        self.inner.remove(entity)
    }

    fn update(&mut self, old: &D::Entity, new: &D::Entity) -> DaoResult<usize> {
        self.authorize_write("update")?;
        self.inner.update(old, new)
    }

    fn last_mutation(&self) -> Option<&MutationRecord<D::Entity>> {
        self.inner.last_mutation()
    }

    fn attach(&mut self, subscriber: Arc<dyn Subscriber<D::Entity>>) {
        self.inner.attach(subscriber);
    }

    fn detach(&mut self, subscriber: &Arc<dyn Subscriber<D::Entity>>) -> bool {
        self.inner.detach(subscriber)
    }
}
