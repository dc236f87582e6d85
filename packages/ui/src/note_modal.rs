use dioxus::prelude::*;
use store::Note;

use crate::icons::FaXmark;
use crate::provider::{refresh, use_notes_view, use_services};
use crate::views::ModalOverlay;
use crate::Icon;

/// Detail view of the selected note: creation time and the full text.
#[component]
pub fn NoteModal(note: Note) -> Element {
    let services = use_services();
    let mut view = use_notes_view();
    let created = note.created_label();

    let on_backdrop = {
        let services = services.clone();
        move |_: ()| {
            services.notes.close();
            refresh(&mut view, &services);
        }
    };
    let on_close = move |_| {
        services.notes.close();
        refresh(&mut view, &services);
    };

    rsx! {
        ModalOverlay {
            on_close: on_backdrop,
            div {
                class: "modal-header",
                div {
                    class: "modal-meta",
                    span { class: "modal-label", "CREATED AT" }
                    span { class: "modal-date", "{created}" }
                }
                button {
                    class: "btn-close",
                    title: "Close",
                    onclick: on_close,
                    Icon { icon: FaXmark, width: 14, height: 14 }
                }
            }
            div {
                class: "modal-body",
                p { "{note.text}" }
            }
        }
    }
}
