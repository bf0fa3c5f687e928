//! Per-DAO subscriber list notified after successful mutations.
//!
//! # Invariants
//! - Every DAO instance owns its own hub; lists are never shared.
//! - Delivery is synchronous and in attachment order.
//! - The first failing subscriber aborts delivery to the rest.

use super::mutation::MutationRecord;
use crate::model::EntityKind;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Listener for DAO mutations.
pub trait Subscriber<E> {
    fn on_mutation(&self, kind: EntityKind, record: &MutationRecord<E>)
        -> Result<(), SubscriberError>;
}

/// Failure reported by a subscriber; propagated to the mutating caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberError {
    pub message: String,
}

impl SubscriberError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for SubscriberError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber failed: {}", self.message)
    }
}

impl Error for SubscriberError {}

pub struct NotificationHub<E> {
    subscribers: Vec<Arc<dyn Subscriber<E>>>,
}

impl<E> Default for NotificationHub<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<E> NotificationHub<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `subscriber`; the same subscriber may be attached twice.
    pub fn attach(&mut self, subscriber: Arc<dyn Subscriber<E>>) {
        self.subscribers.push(subscriber);
    }

    /// Removes the first attachment of `subscriber` (by identity).
    pub fn detach(&mut self, subscriber: &Arc<dyn Subscriber<E>>) -> bool {
        let Some(position) = self
            .subscribers
            .iter()
            .position(|current| Arc::ptr_eq(current, subscriber))
        else {
            return false;
        };
        self.subscribers.remove(position);
        true
    }

    pub fn notify(
        &self,
        kind: EntityKind,
        record: &MutationRecord<E>,
    ) -> Result<(), SubscriberError> {
        for subscriber in &self.subscribers {
            subscriber.on_mutation(kind, record)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// Subscriber that writes one structured log line per mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSubscriber;

impl<E: Display> Subscriber<E> for LoggingSubscriber {
    fn on_mutation(
        &self,
        kind: EntityKind,
        record: &MutationRecord<E>,
    ) -> Result<(), SubscriberError> {
        info!(
            "event=dao_mutation module=dao status=ok kind={} action={} subject={}",
            kind,
            record.action().as_str(),
            record
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationHub, Subscriber, SubscriberError};
    use crate::dao::mutation::MutationRecord;
    use crate::model::catalog::Genre;
    use crate::model::EntityKind;
    use std::sync::{Arc, Mutex};

    struct Tagged {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl Subscriber<Genre> for Tagged {
        fn on_mutation(
            &self,
            _kind: EntityKind,
            _record: &MutationRecord<Genre>,
        ) -> Result<(), SubscriberError> {
            self.log.lock().unwrap().push(self.tag);
            if self.fail {
                return Err(SubscriberError::new(self.tag));
            }
            Ok(())
        }
    }

    fn tagged(
        tag: &'static str,
        log: &Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    ) -> Arc<dyn Subscriber<Genre>> {
        Arc::new(Tagged {
            tag,
            log: Arc::clone(log),
            fail,
        })
    }

    fn record() -> MutationRecord<Genre> {
        MutationRecord::Added {
            object: Genre::new("fps"),
        }
    }

    #[test]
    fn notifies_in_attachment_order_including_duplicates() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = tagged("first", &log, false);
        let second = tagged("second", &log, false);
        let mut hub = NotificationHub::new();
        hub.attach(Arc::clone(&first));
        hub.attach(second);
        hub.attach(first);

        hub.notify(EntityKind::Genre, &record()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "first"]);
    }

    #[test]
    fn detach_removes_only_first_match() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = tagged("first", &log, false);
        let mut hub = NotificationHub::new();
        hub.attach(Arc::clone(&first));
        hub.attach(Arc::clone(&first));

        assert!(hub.detach(&first));
        assert_eq!(hub.len(), 1);
        assert!(hub.detach(&first));
        assert!(!hub.detach(&first));
        assert!(hub.is_empty());
    }

    #[test]
    fn failing_subscriber_stops_delivery() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hub = NotificationHub::new();
        hub.attach(tagged("boom", &log, true));
        hub.attach(tagged("never", &log, false));

        let err = hub.notify(EntityKind::Genre, &record()).unwrap_err();
        assert_eq!(err.message, "boom");
        assert_eq!(*log.lock().unwrap(), vec!["boom"]);
    }
}
