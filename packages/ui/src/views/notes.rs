use dioxus::prelude::*;

use crate::activity_log_panel::ActivityLogPanel;
use crate::navbar::Navbar;
use crate::note_input::NoteInput;
use crate::note_list::NoteList;
use crate::note_modal::NoteModal;
use crate::provider::use_notes_view;

use super::LoginView;

/// The whole app: login screen when signed out, note list otherwise.
#[component]
pub fn NotesPage() -> Element {
    let view = use_notes_view();
    let state = view();

    let Some(identity) = state.identity else {
        return rsx! {
            LoginView {}
            ActivityLogPanel {}
        };
    };

    rsx! {
        Navbar { identity }
        main {
            class: "notes-main",
            NoteInput {}
            NoteList {}
        }
        if let Some(note) = state.selected {
            NoteModal { key: "{note.id}", note }
        }
        ActivityLogPanel {}
    }
}
