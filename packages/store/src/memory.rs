use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, Weak};

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::document::{DocumentStore, Filter, SnapshotListener};
use crate::error::StoreError;
use crate::models::Document;

/// In-memory document store with live queries, for testing and the web build.
///
/// Documents keep insertion order, which is also the order of every snapshot.
///
/// Snapshots are delivered one write at a time, each taken after the previous
/// delivery finished, so a listener never sees an older snapshot after a newer
/// one. Listeners must not write to the store they are registered on.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<Mutex<Inner>>,
    delivery: Arc<Mutex<()>>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Document>>,
    listeners: BTreeMap<u64, Listener>,
    next_listener: u64,
    offline: bool,
}

#[derive(Clone)]
struct Listener {
    collection: String,
    filter: Filter,
    callback: SnapshotListener,
    active: Arc<Mutex<bool>>,
}

impl Listener {
    fn deliver(&self, snapshot: Vec<Document>) {
        let active = self.active.lock().unwrap();
        if *active {
            (self.callback)(snapshot);
        }
    }
}

impl Inner {
    fn matching(&self, collection: &str, filter: &Filter) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default()
    }
}

/// Live query handle returned by [`MemoryDocumentStore::subscribe`].
///
/// Must not be dropped from inside its own listener.
pub struct MemorySubscription {
    id: u64,
    active: Arc<Mutex<bool>>,
    inner: Weak<Mutex<Inner>>,
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        *self.active.lock().unwrap() = false;
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().listeners.remove(&self.id);
        }
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().unwrap().offline = offline;
    }

    /// All documents of a collection, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.inner
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a collection's contents without notifying listeners.
    pub fn load(&self, collection: &str, documents: Vec<Document>) {
        self.inner
            .lock()
            .unwrap()
            .collections
            .insert(collection.to_string(), documents);
    }

    /// Number of live queries currently registered.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    /// Push a fresh snapshot to every listener whose query matches `changed`.
    fn notify(&self, collection: &str, changed: &Document) {
        let _delivery = self.delivery.lock().unwrap();
        let pending: Vec<(Listener, Vec<Document>)> = {
            let inner = self.inner.lock().unwrap();
            inner
                .listeners
                .values()
                .filter(|l| l.collection == collection && l.filter.matches(changed))
                .map(|l| (l.clone(), inner.matching(collection, &l.filter)))
                .collect()
        };
        for (listener, snapshot) in pending {
            listener.deliver(snapshot);
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    type Subscription = MemorySubscription;

    fn subscribe(
        &self,
        collection: &str,
        filter: Filter,
        listener: SnapshotListener,
    ) -> MemorySubscription {
        let active = Arc::new(Mutex::new(true));
        let _delivery = self.delivery.lock().unwrap();
        let (id, listener, initial) = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_listener;
            inner.next_listener += 1;
            let initial = inner.matching(collection, &filter);
            let listener = Listener {
                collection: collection.to_string(),
                filter,
                callback: listener,
                active: active.clone(),
            };
            inner.listeners.insert(id, listener.clone());
            (id, listener, initial)
        };
        tracing::debug!(collection, id, "live query registered");
        listener.deliver(initial);

        MemorySubscription {
            id,
            active,
            inner: Arc::downgrade(&self.inner),
        }
    }

    async fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let doc = {
            let mut inner = self.inner.lock().unwrap();
            if inner.offline {
                return Err(StoreError::Unavailable("store is offline".to_string()));
            }
            let doc = Document::new(Uuid::new_v4().to_string(), fields);
            inner
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(doc.clone());
            doc
        };
        self.notify(collection, &doc);
        Ok(doc.id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let removed = {
            let mut inner = self.inner.lock().unwrap();
            if inner.offline {
                return Err(StoreError::Unavailable("store is offline".to_string()));
            }
            inner.collections.get_mut(collection).and_then(|docs| {
                let pos = docs.iter().position(|d| d.id == id)?;
                Some(docs.remove(pos))
            })
        };
        if let Some(doc) = removed {
            self.notify(collection, &doc);
        }
        Ok(())
    }
}
