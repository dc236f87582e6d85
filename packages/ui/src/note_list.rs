use dioxus::prelude::*;
use store::Note;

use crate::activity_log::{log_activity, use_activity_log, LogLevel};
use crate::icons::FaXmark;
use crate::provider::{refresh, use_notes_view, use_services};
use crate::Icon;

/// The signed-in user's notes, newest first.
#[component]
pub fn NoteList() -> Element {
    let services = use_services();
    let view = use_notes_view();
    let preview_chars = services.config.display.preview_chars;
    let notes = view().notes;

    rsx! {
        div {
            class: "note-list",
            for note in notes.iter() {
                NoteRow {
                    key: "{note.id}",
                    note: note.clone(),
                    preview_chars,
                }
            }
            if notes.is_empty() {
                div { class: "note-list-empty", "No notes saved yet." }
            }
        }
    }
}

/// One list row: a preview of the text with "Open" and delete actions.
#[component]
fn NoteRow(note: Note, preview_chars: usize) -> Element {
    let services = use_services();
    let mut view = use_notes_view();
    let mut activity_log = use_activity_log();
    let preview = note.preview(preview_chars);

    let on_open = {
        let services = services.clone();
        let id = note.id.clone();
        move |_| {
            services.notes.open(&id);
            refresh(&mut view, &services);
        }
    };

    let on_delete = {
        let id = note.id.clone();
        move |evt: Event<MouseData>| {
            evt.stop_propagation();
            let services = services.clone();
            let id = id.clone();
            spawn(async move {
                if let Err(e) = services.notes.delete_note(&id).await {
                    tracing::error!("Failed to delete note {}: {}", id, e);
                    log_activity(
                        &mut activity_log,
                        LogLevel::Error,
                        &format!("Failed to delete note: {e}"),
                    );
                }
                refresh(&mut view, &services);
            });
        }
    };

    rsx! {
        div {
            class: "note-row",
            span { class: "note-row-preview", "{preview}" }
            div {
                class: "note-row-actions",
                button { class: "btn-open", onclick: on_open, "Open" }
                button {
                    class: "btn-delete",
                    title: "Delete",
                    onclick: on_delete,
                    Icon { icon: FaXmark, width: 12, height: 12 }
                }
            }
        }
    }
}
