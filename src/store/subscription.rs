use crate::error::StoreError;
use tracing::error;

type Release = Box<dyn FnOnce() -> Result<(), StoreError> + Send>;

/// RAII handle for a listener attached to a store.
///
/// Releasing detaches the listener; after that it is never called again.
/// Dropping a live subscription releases it too. A release that fails while
/// dropping cannot be returned, so it is reported through `tracing` at error
/// level. Use [`Subscription::unsubscribe`] to get the error back.
pub struct Subscription {
    id: u64,
    release: Option<Release>,
}

impl Subscription {
    pub fn new<F>(id: u64, release: F) -> Self
    where
        F: FnOnce() -> Result<(), StoreError> + Send + 'static,
    {
        Self {
            id,
            release: Some(Box::new(release)),
        }
    }

    /// Store-assigned listener id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Detach the listener now.
    pub fn unsubscribe(mut self) -> Result<(), StoreError> {
        self.release_now()
    }

    fn release_now(&mut self) -> Result<(), StoreError> {
        match self.release.take() {
            Some(release) => release(),
            None => Ok(()),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Err(err) = self.release_now() {
            error!(subscription = self.id, error = %err, "failed to release store subscription");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
