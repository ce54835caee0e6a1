use crate::error::{BindError, StoreError};
use crate::store::{ChangeEvent, Listener, Subscription};
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{debug, error, trace};

/// Message posted by a store listener: `alias` changed `key`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Refresh {
    pub alias: &'static str,
    pub key: String,
}

/// Queue between store listeners and the binder that owns them.
pub(crate) struct Inbox {
    tx: Sender<Refresh>,
    rx: Receiver<Refresh>,
}

impl Inbox {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// Listener for the store bound under `alias`. Events whose old and new
    /// values are structurally equal never reach the inbox.
    pub fn listener(&self, alias: &'static str) -> Listener {
        let tx = self.tx.clone();
        Box::new(move |event: &ChangeEvent| {
            if event.is_noop() {
                trace!(store = alias, key = %event.key, "suppressed unchanged value");
                return;
            }
            // Fails only once the binder is gone.
            let _ = tx.send(Refresh {
                alias,
                key: event.key.clone(),
            });
        })
    }

    /// Take every queued message, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = Refresh> + '_ {
        self.rx.try_iter()
    }

    /// Drop queued messages without applying them.
    pub fn discard(&self) -> usize {
        self.rx.try_iter().count()
    }
}

/// The subscriptions one binder instance holds, one per store, in alias
/// order.
pub(crate) struct Subscriptions {
    entries: Vec<(&'static str, Subscription)>,
    released: bool,
}

impl Subscriptions {
    /// Subscribe once per alias. If any subscription fails, the ones
    /// already opened are released before the error is returned.
    pub fn open<F>(aliases: &[&'static str], mut subscribe: F) -> Result<Self, BindError>
    where
        F: FnMut(&'static str) -> Result<Subscription, StoreError>,
    {
        let mut entries = Vec::with_capacity(aliases.len());
        for &alias in aliases {
            let subscription =
                subscribe(alias).map_err(|source| BindError::Subscribe { alias, source })?;
            debug!(store = alias, subscription = subscription.id(), "subscribed");
            entries.push((alias, subscription));
        }
        Ok(Self {
            entries,
            released: false,
        })
    }

    pub fn is_live(&self) -> bool {
        !self.released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Release every subscription, even past a failure. Returns the first
    /// failure. Later calls do nothing.
    pub fn release_all(&mut self) -> Result<(), BindError> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let mut first = None;
        for (alias, subscription) in self.entries.drain(..) {
            if let Err(source) = subscription.unsubscribe() {
                first.get_or_insert(BindError::Release { alias, source });
            }
        }
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        if let Err(err) = self.release_all() {
            error!(error = %err, "binder dropped with a subscription that failed to release");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn tracked(id: u64, released: &Arc<AtomicUsize>) -> Subscription {
        let released = Arc::clone(released);
        Subscription::new(id, move || {
            released.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn listener_posts_real_changes_only() {
        let inbox = Inbox::new();
        let listener = inbox.listener("counter");

        listener(&ChangeEvent::new("count", json!(0), json!(0)));
        listener(&ChangeEvent::new("count", json!(0), json!(1)));

        let queued: Vec<_> = inbox.drain().collect();
        assert_eq!(
            queued,
            vec![Refresh {
                alias: "counter",
                key: "count".to_string()
            }]
        );
    }

    #[test]
    fn discard_empties_the_queue() {
        let inbox = Inbox::new();
        let listener = inbox.listener("a");
        listener(&ChangeEvent::new("x", json!(1), json!(2)));
        listener(&ChangeEvent::new("x", json!(2), json!(3)));

        assert_eq!(inbox.discard(), 2);
        assert_eq!(inbox.drain().count(), 0);
    }

    #[test]
    fn release_all_is_guarded() {
        let released = Arc::new(AtomicUsize::new(0));
        let mut subs = Subscriptions::open(&["a", "b"], |_| Ok(tracked(1, &released))).unwrap();
        assert_eq!(subs.len(), 2);

        subs.release_all().unwrap();
        subs.release_all().unwrap();
        drop(subs);
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn release_continues_past_failure() {
        let released = Arc::new(AtomicUsize::new(0));
        let mut next = 0;
        let mut subs = Subscriptions::open(&["a", "b", "c"], |_| {
            next += 1;
            if next == 1 {
                Ok(Subscription::new(9, || Err(StoreError::Poisoned)))
            } else {
                Ok(tracked(next, &released))
            }
        })
        .unwrap();

        let err = subs.release_all().unwrap_err();
        assert!(matches!(err, BindError::Release { alias: "a", .. }));
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_open_releases_earlier_subscriptions() {
        let released = Arc::new(AtomicUsize::new(0));
        let result = Subscriptions::open(&["a", "b"], |alias| {
            if alias == "a" {
                Ok(tracked(1, &released))
            } else {
                Err(StoreError::UnknownAlias(alias.to_string()))
            }
        });

        assert!(matches!(result, Err(BindError::Subscribe { alias: "b", .. })));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
