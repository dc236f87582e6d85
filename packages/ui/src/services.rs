//! Shared service constructor for all platforms.
//!
//! Returns the [`store::NoteStore`] and [`store::LocalSession`] pair backed by
//! the platform's document store:
//! - **Web** (WASM): in-memory via [`store::MemoryDocumentStore`]
//! - **Desktop** (native): filesystem via [`store::FileDocumentStore`] under [`data_dir`]

use store::{LocalSession, NoteStore, NotesConfig, StoreError};

#[cfg(target_arch = "wasm32")]
pub type AppDocuments = store::MemoryDocumentStore;
#[cfg(not(target_arch = "wasm32"))]
pub type AppDocuments = store::FileDocumentStore;

/// Everything a running client talks to, provided to components via context.
#[derive(Clone)]
pub struct Services {
    pub notes: NoteStore<AppDocuments>,
    pub session: LocalSession,
    pub config: NotesConfig,
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        self.notes.ptr_eq(&other.notes) && self.config == other.config
    }
}

/// Open the platform document store and build the services for `config`.
pub fn make_services(config: NotesConfig) -> Result<Services, StoreError> {
    let docs = open_documents()?;
    Ok(Services {
        notes: NoteStore::new(docs, config.store.collection.clone()),
        session: LocalSession::new(config.profile.clone()),
        config,
    })
}

#[cfg(target_arch = "wasm32")]
fn open_documents() -> Result<AppDocuments, StoreError> {
    Ok(store::MemoryDocumentStore::new())
}

#[cfg(not(target_arch = "wasm32"))]
fn open_documents() -> Result<AppDocuments, StoreError> {
    store::FileDocumentStore::open(data_dir())
}

/// Platform data directory for notes: `<data_dir>/notes/`.
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("notes")
}

/// Load `notes.toml` from the data directory, falling back to the defaults
/// when it is missing or unreadable.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_config() -> NotesConfig {
    let path = data_dir().join(NotesConfig::filename());
    NotesConfig::load(&path).unwrap_or_else(|e| {
        tracing::error!("Failed to load {}: {e}", path.display());
        NotesConfig::default()
    })
}

#[cfg(target_arch = "wasm32")]
pub fn load_config() -> NotesConfig {
    NotesConfig::default()
}
