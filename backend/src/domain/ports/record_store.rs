//! Port for the hosted realtime record store.
//!
//! The application owns no database. Every collection lives in an external
//! key-value tree consumed through this narrow contract: point reads,
//! whole-node writes, merge updates, appends under generated keys, deletes,
//! and continuous change subscriptions. Adapters speak to the hosted
//! service or to an in-process tree for tests and development.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::domain::donor::FORBIDDEN_KEY_CHARS;

/// Object layout used for merge updates.
pub type JsonMap = serde_json::Map<String, Value>;

/// Errors raised by record store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The path contains segments the store would reject.
    #[error("invalid store path: {message}")]
    InvalidPath { message: String },
    /// The store could not be reached.
    #[error("record store unreachable: {message}")]
    Unavailable { message: String },
    /// The store refused the operation.
    #[error("record store denied the operation: {message}")]
    Denied { message: String },
    /// The store answered with something the adapter cannot interpret.
    #[error("unexpected record store response: {message}")]
    Protocol { message: String },
}

impl StoreError {
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::Denied {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

/// Slash-separated location of a node in the store tree.
///
/// ## Invariants
/// - At least one segment.
/// - No empty segments and no characters the store rejects in keys.
///
/// # Examples
/// ```
/// use backend::domain::ports::StorePath;
///
/// let users = StorePath::new("users").unwrap();
/// let record = users.child("abc123").unwrap();
/// assert_eq!(record.as_str(), "users/abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath(String);

impl StorePath {
    /// Validate and construct a path from a slash-separated string.
    pub fn new(path: impl AsRef<str>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.is_empty() {
            return Err(StoreError::invalid_path("path must not be empty"));
        }
        for segment in path.split('/') {
            validate_segment(segment)?;
        }
        Ok(Self(path.to_owned()))
    }

    /// Append one key segment.
    pub fn child(&self, segment: impl AsRef<str>) -> Result<Self, StoreError> {
        let segment = segment.as_ref();
        validate_segment(segment)?;
        Ok(Self(format!("{}/{segment}", self.0)))
    }

    /// The slash-separated path string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `other` equals this path or lies underneath it.
    pub fn contains(&self, other: &Self) -> bool {
        other.0 == self.0 || other.0.starts_with(&format!("{}/", self.0))
    }

    /// Path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

fn validate_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() {
        return Err(StoreError::invalid_path("empty path segment"));
    }
    if segment.contains(FORBIDDEN_KEY_CHARS) {
        return Err(StoreError::invalid_path(format!(
            "segment {segment:?} contains a character the store rejects"
        )));
    }
    Ok(())
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live subscription to one store path.
///
/// Each received item is the full value at the subscribed path, `None` when
/// the node is absent. The store echoes the subscriber's own writes.
/// Dropping the subscription tears down the underlying listener, so no
/// callback can outlive the view that created it.
pub struct StoreSubscription {
    receiver: mpsc::UnboundedReceiver<Option<Value>>,
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl StoreSubscription {
    /// Wrap a change channel together with a teardown hook run on drop.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<Option<Value>>,
        teardown: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Wait for the next change notification.
    ///
    /// Returns `None` once the feeding adapter is gone.
    pub async fn changed(&mut self) -> Option<Option<Value>> {
        self.receiver.recv().await
    }
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for StoreSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSubscription").finish_non_exhaustive()
    }
}

/// Port for the hosted realtime record store.
///
/// All operations are asynchronous and run to completion; no cancellation
/// token is threaded through. `write_partial` has merge semantics: fields
/// absent from the map keep their stored value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point read of the value at `path`, `None` when absent.
    async fn read_once(&self, path: &StorePath) -> Result<Option<Value>, StoreError>;

    /// Replace the node at `path` with `value`.
    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError>;

    /// Merge `fields` into the object at `path`.
    async fn write_partial(&self, path: &StorePath, fields: JsonMap) -> Result<(), StoreError>;

    /// Append `value` under a fresh chronologically ordered key, returning
    /// the generated key.
    async fn push(&self, path: &StorePath, value: Value) -> Result<String, StoreError>;

    /// Remove the node at `path`. Removing an absent node succeeds.
    async fn delete(&self, path: &StorePath) -> Result<(), StoreError>;

    /// Open a continuous listener on `path`.
    async fn subscribe(&self, path: &StorePath) -> Result<StoreSubscription, StoreError>;
}

/// Fixture store for tests that never reads anything back.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecordStore;

#[async_trait]
impl RecordStore for FixtureRecordStore {
    async fn read_once(&self, _path: &StorePath) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }

    async fn write(&self, _path: &StorePath, _value: Value) -> Result<(), StoreError> {
        Ok(())
    }

    async fn write_partial(&self, _path: &StorePath, _fields: JsonMap) -> Result<(), StoreError> {
        Ok(())
    }

    async fn push(&self, _path: &StorePath, _value: Value) -> Result<String, StoreError> {
        Ok(uuid::Uuid::new_v4().simple().to_string())
    }

    async fn delete(&self, _path: &StorePath) -> Result<(), StoreError> {
        Ok(())
    }

    async fn subscribe(&self, _path: &StorePath) -> Result<StoreSubscription, StoreError> {
        let (_sender, receiver) = mpsc::unbounded_channel();
        Ok(StoreSubscription::new(receiver, || {}))
    }
}
