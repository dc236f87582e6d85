//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const MAIN_CSS: Asset = asset!("/assets/main.css");

mod services;
pub use services::{load_config, make_services, AppDocuments, Services};
#[cfg(not(target_arch = "wasm32"))]
pub use services::data_dir;

mod app;
pub use app::NotesApp;

mod provider;
pub use provider::{use_notes_view, use_services, NotesProvider};

mod auth;
pub use auth::{LoginButton, LogoutButton};

pub mod activity_log;
pub use activity_log::{log_activity, use_activity_log, ActivityLog, LogLevel};

mod activity_log_panel;
pub use activity_log_panel::{ActivityLogPanel, ActivityLogToggle};

mod navbar;
pub use navbar::Navbar;

mod note_input;
pub use note_input::NoteInput;

mod note_list;
pub use note_list::NoteList;

mod note_modal;
pub use note_modal::NoteModal;

pub mod views;
