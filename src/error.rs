//! Error types for stores and binders.

use thiserror::Error;

/// Errors raised by a store while subscribing, releasing or mutating.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("listener {0} is not registered with this store")]
    UnknownListener(u64),

    #[error("no store is bound under alias `{0}`")]
    UnknownAlias(String),

    #[error("failed to serialize store state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by a binder during mount or teardown.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("failed to subscribe to store `{alias}`: {source}")]
    Subscribe {
        alias: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("failed to release subscription to store `{alias}`: {source}")]
    Release {
        alias: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
