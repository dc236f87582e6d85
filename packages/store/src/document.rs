//! # Document store interface
//!
//! The hosted document database is reached only through [`DocumentStore`]:
//! live queries that push the full matching result set on every change, and
//! asynchronous create/delete. Implementations live in sibling modules
//! ([`crate::memory`], [`crate::file_store`]).

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::models::Document;

/// Callback invoked with every snapshot of a live query.
pub type SnapshotListener = Arc<dyn Fn(Vec<Document>) + Send + Sync>;

/// Equality filter on a single field, the only query shape notes need.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.field_equals(&self.field, &self.value)
    }
}

/// Async interface to a document collection with live queries.
pub trait DocumentStore {
    /// Handle for an active live query. Dropping it unregisters the listener;
    /// the listener is not called again once the drop has returned.
    type Subscription;

    /// Start a live query. `listener` receives the current result set right
    /// away and again after every change to a matching document.
    fn subscribe(
        &self,
        collection: &str,
        filter: Filter,
        listener: SnapshotListener,
    ) -> Self::Subscription;

    /// Create a document and return its store-assigned id.
    fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> impl Future<Output = Result<String, StoreError>>;

    /// Delete a document. Deleting an id that does not exist succeeds.
    fn delete(&self, collection: &str, id: &str) -> impl Future<Output = Result<(), StoreError>>;
}
