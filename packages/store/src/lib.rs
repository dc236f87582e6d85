pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod notes;
pub mod session;

mod memory;
pub use memory::{MemoryDocumentStore, MemorySubscription};

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileDocumentStore;

pub use config::NotesConfig;
pub use document::{DocumentStore, Filter, SnapshotListener};
pub use error::{AuthError, ConfigError, NoteError, StoreError};
pub use models::{Document, Identity, Note};
pub use notes::{NoteStore, NotesView};
pub use session::{LocalSession, SessionProvider};
