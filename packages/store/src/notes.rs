//! # Note store: the signed-in user's live, ordered notes
//!
//! [`NoteStore`] owns the state of one running client: the current identity,
//! the single live query for that identity's notes, the selected note and the
//! draft being typed. It is a cheap cloneable handle over shared state.
//!
//! ## Synchronization
//!
//! [`subscribe`](NoteStore::subscribe) is the only state transition. It empties
//! the visible list and retires the previous query before returning, then
//! (with an identity) opens a query for `owner == identity.id`. Each snapshot
//! is decoded, filtered to the owner, sorted newest first and published
//! through a `tokio::sync::watch` channel (see [`notes`](NoteStore::notes)).
//!
//! Every query carries the generation it was opened under. A snapshot from an
//! older generation is dropped, so a previous identity's notes can never be
//! published after a switch, even if the document store delivers late.
//!
//! ## Writes
//!
//! [`add_note`](NoteStore::add_note) and [`delete_note`](NoteStore::delete_note)
//! do not touch the visible list. Their effect arrives with the next snapshot.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::document::{DocumentStore, Filter, SnapshotListener};
use crate::error::NoteError;
use crate::models::{Document, Identity, Note, NoteFields, OWNER_FIELD};

/// Everything the UI needs to render, read atomically.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotesView {
    pub identity: Option<Identity>,
    pub notes: Vec<Note>,
    pub selected: Option<Note>,
    pub draft: String,
}

/// Per-client note state backed by a [`DocumentStore`].
pub struct NoteStore<D: DocumentStore> {
    inner: Arc<Inner<D>>,
}

impl<D: DocumentStore> Clone for NoteStore<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<D: DocumentStore> {
    docs: D,
    collection: String,
    feed: Arc<Mutex<Feed>>,
    session: Mutex<Session<D::Subscription>>,
}

/// Visible list plus the generation allowed to publish into it.
struct Feed {
    generation: u64,
    notes: watch::Sender<Vec<Note>>,
}

struct Session<S> {
    identity: Option<Identity>,
    subscription: Option<S>,
    selected: Option<String>,
    draft: String,
}

impl<D: DocumentStore> NoteStore<D> {
    pub fn new(docs: D, collection: impl Into<String>) -> Self {
        let (notes, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                docs,
                collection: collection.into(),
                feed: Arc::new(Mutex::new(Feed {
                    generation: 0,
                    notes,
                })),
                session: Mutex::new(Session {
                    identity: None,
                    subscription: None,
                    selected: None,
                    draft: String::new(),
                }),
            }),
        }
    }

    /// Whether both handles share the same state.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.session.lock().unwrap().identity.clone()
    }

    /// Switch to `identity`, or sign out with `None`.
    pub fn subscribe(&self, identity: Option<Identity>) {
        let (previous, generation) = {
            let mut session = self.inner.session.lock().unwrap();
            if session.identity == identity && (identity.is_none() || session.subscription.is_some()) {
                return;
            }
            session.identity = identity.clone();
            session.selected = None;
            let previous = session.subscription.take();

            let mut feed = self.inner.feed.lock().unwrap();
            feed.generation += 1;
            feed.notes.send_replace(Vec::new());
            (previous, feed.generation)
        };
        drop(previous);

        let Some(identity) = identity else {
            tracing::debug!("signed out, note query closed");
            return;
        };

        tracing::debug!(user = %identity.id, generation, "opening note query");
        let subscription = self.inner.docs.subscribe(
            &self.inner.collection,
            Filter::field_eq(OWNER_FIELD, identity.id.clone()),
            snapshot_listener(self.inner.feed.clone(), generation, identity.id),
        );

        let mut session = self.inner.session.lock().unwrap();
        if self.inner.feed.lock().unwrap().generation == generation {
            session.subscription = Some(subscription);
        }
    }

    /// Apply every value of an identity feed until the feed closes, then sign out.
    pub async fn follow(&self, identity: watch::Receiver<Option<Identity>>) {
        self.follow_with(identity, |_| {}).await
    }

    /// Like [`follow`](Self::follow), calling `on_change` with the new view
    /// after each identity change.
    pub async fn follow_with(
        &self,
        mut identity: watch::Receiver<Option<Identity>>,
        mut on_change: impl FnMut(&NotesView),
    ) {
        loop {
            let current = identity.borrow_and_update().clone();
            self.subscribe(current);
            on_change(&self.view());
            if identity.changed().await.is_err() {
                break;
            }
        }
        self.subscribe(None);
        on_change(&self.view());
    }

    /// Live, ordered notes of the current identity.
    pub fn notes(&self) -> watch::Receiver<Vec<Note>> {
        self.inner.feed.lock().unwrap().notes.subscribe()
    }

    pub fn current(&self) -> Vec<Note> {
        self.inner.feed.lock().unwrap().notes.borrow().clone()
    }

    pub fn view(&self) -> NotesView {
        let session = self.inner.session.lock().unwrap();
        let notes = self.inner.feed.lock().unwrap().notes.borrow().clone();
        let selected = session
            .selected
            .as_ref()
            .and_then(|id| notes.iter().find(|n| &n.id == id).cloned());
        NotesView {
            identity: session.identity.clone(),
            notes,
            selected,
            draft: session.draft.clone(),
        }
    }

    /// Create a note for the current identity.
    ///
    /// Whitespace-only text is ignored and returns `Ok(None)`. The new note
    /// shows up with the next snapshot, not through the return value.
    pub async fn add_note(&self, text: &str) -> Result<Option<String>, NoteError> {
        let owner = self.identity().ok_or(NoteError::SignedOut)?.id;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let fields = NoteFields {
            text: text.to_string(),
            owner,
            created_at: Utc::now(),
        };
        let id = self
            .inner
            .docs
            .create(&self.inner.collection, fields.into_fields())
            .await?;
        tracing::info!(id = %id, "note created");
        Ok(Some(id))
    }

    /// Delete a note, closing it if it is the selected one.
    ///
    /// The selection is kept when the delete fails, since the note is still there.
    pub async fn delete_note(&self, id: &str) -> Result<(), NoteError> {
        self.inner.docs.delete(&self.inner.collection, id).await?;
        {
            let mut session = self.inner.session.lock().unwrap();
            if session.selected.as_deref() == Some(id) {
                session.selected = None;
            }
        }
        tracing::info!(id, "note deleted");
        Ok(())
    }

    /// Select a visible note for the detail view. Returns `false` if `id` is not visible.
    pub fn open(&self, id: &str) -> bool {
        let visible = self.current().iter().any(|n| n.id == id);
        if visible {
            self.inner.session.lock().unwrap().selected = Some(id.to_string());
        }
        visible
    }

    pub fn close(&self) {
        self.inner.session.lock().unwrap().selected = None;
    }

    /// The selected note, as long as it is still in the visible list.
    pub fn selected(&self) -> Option<Note> {
        self.view().selected
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.inner.session.lock().unwrap().draft = text.into();
    }

    pub fn draft(&self) -> String {
        self.inner.session.lock().unwrap().draft.clone()
    }

    /// Save the draft as a note, clearing it once the write succeeded.
    pub async fn save_draft(&self) -> Result<Option<String>, NoteError> {
        let draft = self.draft();
        let created = self.add_note(&draft).await?;
        if created.is_some() {
            let mut session = self.inner.session.lock().unwrap();
            if session.draft == draft {
                session.draft.clear();
            }
        }
        Ok(created)
    }
}

fn snapshot_listener(feed: Arc<Mutex<Feed>>, generation: u64, owner: String) -> SnapshotListener {
    Arc::new(move |docs: Vec<Document>| {
        let notes = order_snapshot(&docs, &owner, Utc::now());
        let feed = feed.lock().unwrap();
        if feed.generation != generation {
            tracing::debug!(generation, "dropping snapshot from a closed query");
            return;
        }
        feed.notes.send_replace(notes);
    })
}

/// Decode a snapshot into the notes of `owner`, newest first.
///
/// Notes without a usable timestamp count as created at `now`. The sort is
/// stable, so equal timestamps keep snapshot order.
pub fn order_snapshot(docs: &[Document], owner: &str, now: DateTime<Utc>) -> Vec<Note> {
    let mut notes: Vec<Note> = docs
        .iter()
        .filter_map(|doc| {
            let note = Note::from_document(doc);
            if note.is_none() {
                tracing::warn!(id = %doc.id, "skipping malformed note record");
            }
            note
        })
        .filter(|note| note.owner == owner)
        .collect();
    notes.sort_by(|a, b| b.sort_key(now).cmp(&a.sort_key(now)));
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryDocumentStore;
    use crate::session::{LocalSession, SessionProvider};
    use chrono::TimeZone;
    use serde_json::{json, Map, Value};

    const NOTES: &str = "notes";

    fn alice() -> Identity {
        Identity::new("alice", "Alice")
    }

    fn bob() -> Identity {
        Identity::new("bob", "Bob")
    }

    fn setup() -> (MemoryDocumentStore, NoteStore<MemoryDocumentStore>) {
        let docs = MemoryDocumentStore::new();
        let store = NoteStore::new(docs.clone(), NOTES);
        (docs, store)
    }

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be an object"),
        }
    }

    async fn seed(docs: &MemoryDocumentStore, owner: &str, text: &str, created_at: Value) -> String {
        let mut f = fields(json!({ "text": text, "owner": owner }));
        if !created_at.is_null() {
            f.insert("createdAt".to_string(), created_at);
        }
        docs.create(NOTES, f).await.unwrap()
    }

    fn texts(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.text.as_str()).collect()
    }

    /// Let other branches of a `tokio::join!` run.
    async fn settle() {
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_only_own_notes_are_visible() {
        let (docs, store) = setup();
        seed(&docs, "alice", "a1", json!("2024-01-01T10:00:00Z")).await;
        seed(&docs, "bob", "b1", json!("2024-01-01T11:00:00Z")).await;

        store.subscribe(Some(alice()));
        let notes = store.current();
        assert_eq!(texts(&notes), vec!["a1"]);
        assert!(notes.iter().all(|n| n.owner == "alice"));

        seed(&docs, "bob", "b2", Value::Null).await;
        assert_eq!(texts(&store.current()), vec!["a1"]);
    }

    #[tokio::test]
    async fn test_sign_out_empties_list_immediately() {
        let (docs, store) = setup();
        let id = seed(&docs, "alice", "a1", Value::Null).await;
        store.subscribe(Some(alice()));
        assert!(store.open(&id));
        assert_eq!(store.current().len(), 1);

        store.subscribe(None);
        assert!(store.current().is_empty());
        assert!(store.selected().is_none());
        assert!(store.identity().is_none());
        assert_eq!(docs.listener_count(), 0);

        // Signing out twice is harmless.
        store.subscribe(None);
        assert!(store.current().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_note_is_ignored() {
        let (docs, store) = setup();
        store.subscribe(Some(alice()));
        let mut rx = store.notes();
        let _ = rx.borrow_and_update();

        assert_eq!(store.add_note("   ").await.unwrap(), None);
        assert_eq!(store.add_note("\n\t").await.unwrap(), None);
        assert!(docs.documents(NOTES).is_empty());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_add_note_arrives_through_snapshot() {
        let (docs, store) = setup();
        seed(&docs, "alice", "older", json!("2020-01-01T00:00:00Z")).await;
        store.subscribe(Some(alice()));
        assert_eq!(store.current().len(), 1);

        let id = store.add_note("  hello ").await.unwrap().unwrap();

        let notes = store.current();
        assert_eq!(notes.len(), 2);
        let added: Vec<&Note> = notes.iter().filter(|n| n.text == "hello").collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].id, id);
        assert_eq!(added[0].owner, "alice");
        assert!(added[0].created_at.is_some());
        assert_eq!(notes[0].id, id);
    }

    #[tokio::test]
    async fn test_add_note_requires_identity() {
        let (docs, store) = setup();
        assert!(matches!(
            store.add_note("hello").await,
            Err(NoteError::SignedOut)
        ));
        assert!(docs.documents(NOTES).is_empty());
    }

    #[tokio::test]
    async fn test_missing_timestamp_sorts_first() {
        let (docs, store) = setup();
        seed(&docs, "alice", "t1", json!("2024-03-01T10:00:00Z")).await;
        seed(&docs, "alice", "t2", json!("2024-03-01T12:00:00Z")).await;
        seed(&docs, "alice", "t3", Value::Null).await;

        store.subscribe(Some(alice()));
        assert_eq!(texts(&store.current()), vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn test_order_snapshot_keeps_ties_in_snapshot_order() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let doc = |id: &str, owner: &str, at: Value| {
            Document::new(id, fields(json!({ "text": id, "owner": owner, "createdAt": at })))
        };
        let docs = vec![
            doc("first", "alice", json!("2024-01-01T00:00:00Z")),
            doc("other", "bob", json!("2024-05-01T00:00:00Z")),
            doc("second", "alice", json!("2024-01-01T00:00:00Z")),
            doc("broken", "alice", json!(false)),
            Document::new("no-text", fields(json!({ "owner": "alice" }))),
        ];

        let notes = order_snapshot(&docs, "alice", now);
        assert_eq!(texts(&notes), vec!["broken", "first", "second"]);
    }

    #[tokio::test]
    async fn test_delete_selected_note_clears_selection() {
        let (docs, store) = setup();
        let keep = seed(&docs, "alice", "keep", json!("2024-01-01T00:00:00Z")).await;
        let doomed = seed(&docs, "alice", "doomed", json!("2024-01-02T00:00:00Z")).await;
        store.subscribe(Some(alice()));

        assert!(store.open(&doomed));
        assert_eq!(store.selected().map(|n| n.text), Some("doomed".to_string()));

        store.delete_note(&doomed).await.unwrap();
        assert!(store.selected().is_none());
        let notes = store.current();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, keep);
    }

    #[tokio::test]
    async fn test_delete_other_note_keeps_selection() {
        let (docs, store) = setup();
        let open = seed(&docs, "alice", "open", Value::Null).await;
        let other = seed(&docs, "alice", "other", Value::Null).await;
        store.subscribe(Some(alice()));

        store.open(&open);
        store.delete_note(&other).await.unwrap();
        assert_eq!(store.selected().map(|n| n.id), Some(open));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_selection() {
        let (docs, store) = setup();
        let id = seed(&docs, "alice", "still here", Value::Null).await;
        store.subscribe(Some(alice()));
        store.open(&id);
        docs.set_offline(true);

        assert!(store.delete_note(&id).await.is_err());
        assert_eq!(store.selected().map(|n| n.id), Some(id));
    }

    #[tokio::test]
    async fn test_open_unknown_note_is_rejected() {
        let (_docs, store) = setup();
        store.subscribe(Some(alice()));
        assert!(!store.open("missing"));
        assert!(store.selected().is_none());
    }

    #[tokio::test]
    async fn test_switching_identity_closes_previous_query() {
        let (docs, store) = setup();
        seed(&docs, "alice", "a1", Value::Null).await;
        seed(&docs, "bob", "b1", Value::Null).await;

        store.subscribe(Some(alice()));
        store.subscribe(Some(bob()));
        assert_eq!(docs.listener_count(), 1);
        assert_eq!(texts(&store.current()), vec!["b1"]);

        let mut rx = store.notes();
        let _ = rx.borrow_and_update();
        seed(&docs, "alice", "a2", Value::Null).await;
        assert!(!rx.has_changed().unwrap());
        assert!(store.current().iter().all(|n| n.owner == "bob"));
    }

    #[tokio::test]
    async fn test_stale_listener_cannot_publish() {
        let (_docs, store) = setup();
        store.subscribe(Some(alice()));
        let stale = snapshot_listener(store.inner.feed.clone(), 1, "alice".to_string());

        store.subscribe(Some(bob()));
        stale(vec![Document::new(
            "late",
            fields(json!({ "text": "late", "owner": "alice" })),
        )]);
        assert!(store.current().is_empty());
    }

    #[tokio::test]
    async fn test_resubscribing_same_identity_keeps_query() {
        let (docs, store) = setup();
        seed(&docs, "alice", "a1", Value::Null).await;
        store.subscribe(Some(alice()));
        let mut rx = store.notes();
        let _ = rx.borrow_and_update();

        store.subscribe(Some(alice()));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(docs.listener_count(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let (docs, store) = setup();
        let id = seed(&docs, "alice", "a1", Value::Null).await;
        store.subscribe(Some(alice()));
        docs.set_offline(true);

        assert!(matches!(
            store.add_note("hello").await,
            Err(NoteError::Store(StoreError::Unavailable(_)))
        ));
        assert!(matches!(
            store.delete_note(&id).await,
            Err(NoteError::Store(StoreError::Unavailable(_)))
        ));
        assert_eq!(store.current().len(), 1);
    }

    #[tokio::test]
    async fn test_save_draft_clears_only_on_success() {
        let (docs, store) = setup();
        store.subscribe(Some(alice()));

        store.set_draft("   ");
        assert_eq!(store.save_draft().await.unwrap(), None);
        assert_eq!(store.draft(), "   ");

        store.set_draft("remember the milk");
        docs.set_offline(true);
        assert!(store.save_draft().await.is_err());
        assert_eq!(store.draft(), "remember the milk");

        docs.set_offline(false);
        assert!(store.save_draft().await.unwrap().is_some());
        assert_eq!(store.draft(), "");
        assert_eq!(texts(&store.current()), vec!["remember the milk"]);
    }

    #[tokio::test]
    async fn test_view_is_consistent() {
        let (docs, store) = setup();
        let id = seed(&docs, "alice", "a1", Value::Null).await;
        store.subscribe(Some(alice()));
        store.open(&id);
        store.set_draft("typing");

        let view = store.view();
        assert_eq!(view.identity, Some(alice()));
        assert_eq!(view.notes.len(), 1);
        assert_eq!(view.selected.map(|n| n.id), Some(id));
        assert_eq!(view.draft, "typing");
    }

    #[tokio::test]
    async fn test_follow_tracks_session() {
        let (docs, store) = setup();
        seed(&docs, "local", "mine", Value::Null).await;
        seed(&docs, "someone", "theirs", Value::Null).await;
        let session = LocalSession::new(Some(Identity::new("local", "Local User")));

        let identity = session.identity();
        let driver = {
            let store = store.clone();
            let docs = docs.clone();
            async move {
                settle().await;
                assert!(store.current().is_empty());

                session.sign_in().await.unwrap();
                settle().await;
                assert_eq!(texts(&store.current()), vec!["mine"]);

                session.sign_out().await.unwrap();
                settle().await;
                assert!(store.current().is_empty());
                assert_eq!(docs.listener_count(), 0);

                session.sign_in().await.unwrap();
                settle().await;
                assert_eq!(docs.listener_count(), 1);
                drop(session);
            }
        };

        tokio::join!(store.follow(identity), driver);
        assert!(store.current().is_empty());
        assert_eq!(docs.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_follow_with_reports_each_change() {
        let (_docs, store) = setup();
        let (tx, rx) = watch::channel(None);
        let mut seen: Vec<Option<String>> = Vec::new();

        let driver = async move {
            settle().await;
            tx.send_replace(Some(alice()));
            settle().await;
            tx.send_replace(Some(bob()));
            settle().await;
        };

        tokio::join!(
            store.follow_with(rx, |view| seen.push(view.identity.as_ref().map(|i| i.id.clone()))),
            driver
        );
        assert_eq!(
            seen,
            vec![
                None,
                Some("alice".to_string()),
                Some("bob".to_string()),
                None
            ]
        );
    }
}
