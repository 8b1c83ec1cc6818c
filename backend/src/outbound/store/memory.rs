//! In-process record store with realtime change notifications.
//!
//! Development and test stand-in for the hosted store. It keeps the whole
//! tree as one JSON value and mirrors the hosted semantics that the rest
//! of the code relies on:
//!
//! - merge updates touch only the named fields, and a `null` field value
//!   removes the key;
//! - writing `null` deletes the node;
//! - push keys sort in insertion order;
//! - subscriptions fire with the full node value on every change under or
//!   above the subscribed path, the subscriber's own writes included, and
//!   deliver the current value immediately on subscribe.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::domain::ports::{
    JsonMap, RecordStore, StoreError, StorePath, StoreSubscription,
};

struct Watcher {
    path: StorePath,
    sender: mpsc::UnboundedSender<Option<Value>>,
}

struct StoreInner {
    tree: RwLock<Value>,
    watchers: Mutex<HashMap<u64, Watcher>>,
    next_watcher_id: AtomicU64,
    push_counter: AtomicU64,
}

/// In-memory [`RecordStore`] implementation.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    inner: Arc<StoreInner>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                tree: RwLock::new(Value::Object(Map::new())),
                watchers: Mutex::new(HashMap::new()),
                next_watcher_id: AtomicU64::new(1),
                push_counter: AtomicU64::new(1),
            }),
        }
    }

    /// Seed the store with an initial tree, for tests and local runs.
    pub fn with_tree(tree: Value) -> Self {
        let store = Self::new();
        *store.inner.write_tree() = tree;
        store
    }
}

impl StoreInner {
    fn read_tree(&self) -> std::sync::RwLockReadGuard<'_, Value> {
        self.tree
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_tree(&self) -> std::sync::RwLockWriteGuard<'_, Value> {
        self.tree
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_watchers(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Watcher>> {
        self.watchers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Notify every watcher overlapping `changed`, pruning gone receivers.
    fn notify(&self, changed: &StorePath) {
        let tree = self.read_tree();
        let mut watchers = self.lock_watchers();
        watchers.retain(|_, watcher| {
            if !(watcher.path.contains(changed) || changed.contains(&watcher.path)) {
                return true;
            }
            let snapshot = node_at(&tree, &watcher.path).cloned();
            watcher.sender.send(snapshot).is_ok()
        });
    }
}

impl InMemoryRecordStore {
    fn mutate<F>(&self, path: &StorePath, op: F)
    where
        F: FnOnce(&mut Value),
    {
        {
            let mut tree = self.inner.write_tree();
            op(&mut tree);
        }
        self.inner.notify(path);
    }
}

/// Borrow the node at `path`, `None` when absent.
fn node_at<'tree>(root: &'tree Value, path: &StorePath) -> Option<&'tree Value> {
    let mut node = root;
    for segment in path.segments() {
        node = node.as_object()?.get(segment)?;
    }
    if node.is_null() { None } else { Some(node) }
}

/// View `node` as an object, overwriting any other shape with an empty one.
fn coerce_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("value was coerced to an object"),
    }
}

/// Walk to the object at `path`, creating intermediate objects.
fn object_at_mut<'tree>(root: &'tree mut Value, path: &StorePath) -> &'tree mut Map<String, Value> {
    let mut node = root;
    for segment in path.segments() {
        node = coerce_object(node)
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    coerce_object(node)
}

/// Replace the node at `path`, creating intermediate objects.
///
/// A `null` replacement removes the node, matching the hosted semantics.
fn set_node(root: &mut Value, path: &StorePath, value: Value) {
    let segments: Vec<&str> = path.segments().collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        node = coerce_object(node)
            .entry((*segment).to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let map = coerce_object(node);
    if value.is_null() {
        map.remove(*leaf);
    } else {
        map.insert((*leaf).to_owned(), value);
    }
}

/// Merge `fields` into the object at `path`; `null` values remove keys.
fn merge_node(root: &mut Value, path: &StorePath, fields: JsonMap) {
    let map = object_at_mut(root, path);
    for (key, value) in fields {
        if value.is_null() {
            map.remove(&key);
        } else {
            map.insert(key, value);
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn read_once(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        let tree = self.inner.read_tree();
        Ok(node_at(&tree, path).cloned())
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        self.mutate(path, |tree| set_node(tree, path, value));
        Ok(())
    }

    async fn write_partial(&self, path: &StorePath, fields: JsonMap) -> Result<(), StoreError> {
        self.mutate(path, |tree| merge_node(tree, path, fields));
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String, StoreError> {
        let counter = self.inner.push_counter.fetch_add(1, Ordering::Relaxed);
        // Zero-padded hex keeps lexicographic order equal to insertion
        // order, like the hosted push keys.
        let key = format!("k{counter:016x}");
        let child = path.child(&key)?;
        self.mutate(&child, |tree| set_node(tree, &child, value));
        Ok(key)
    }

    async fn delete(&self, path: &StorePath) -> Result<(), StoreError> {
        self.mutate(path, |tree| set_node(tree, path, Value::Null));
        Ok(())
    }

    async fn subscribe(&self, path: &StorePath) -> Result<StoreSubscription, StoreError> {
        let (sender, receiver) = mpsc::unbounded_channel();

        // Deliver the current value before any change, so a fresh listener
        // starts from a full snapshot.
        let snapshot = {
            let tree = self.inner.read_tree();
            node_at(&tree, path).cloned()
        };
        let _ = sender.send(snapshot);

        let id = self.inner.next_watcher_id.fetch_add(1, Ordering::Relaxed);
        self.inner.lock_watchers().insert(
            id,
            Watcher {
                path: path.clone(),
                sender,
            },
        );

        let inner = Arc::clone(&self.inner);
        Ok(StoreSubscription::new(receiver, move || {
            inner.lock_watchers().remove(&id);
        }))
    }
}
