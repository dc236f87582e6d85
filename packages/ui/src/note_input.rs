use dioxus::prelude::*;

use crate::activity_log::{log_activity, use_activity_log, LogLevel};
use crate::provider::{refresh, use_notes_view, use_services};

/// Text area plus "Save" button for writing a new note.
#[component]
pub fn NoteInput() -> Element {
    let services = use_services();
    let mut view = use_notes_view();
    let mut activity_log = use_activity_log();
    let mut saving = use_signal(|| false);

    let on_input = {
        let services = services.clone();
        move |evt: FormEvent| {
            services.notes.set_draft(evt.value());
            refresh(&mut view, &services);
        }
    };

    let on_save = move |_| {
        let services = services.clone();
        async move {
            saving.set(true);
            match services.notes.save_draft().await {
                Ok(Some(_)) => {
                    log_activity(&mut activity_log, LogLevel::Success, "Note saved");
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Failed to save note: {}", e);
                    log_activity(
                        &mut activity_log,
                        LogLevel::Error,
                        &format!("Failed to save note: {e}"),
                    );
                }
            }
            refresh(&mut view, &services);
            saving.set(false);
        }
    };

    rsx! {
        div {
            class: "note-input",
            textarea {
                class: "note-input-text",
                placeholder: "Write your note here...",
                value: view().draft,
                oninput: on_input,
            }
            button {
                class: "btn-primary",
                disabled: saving(),
                onclick: on_save,
                "Save"
            }
        }
    }
}
