use dioxus::prelude::*;
use store::NotesConfig;

use crate::provider::NotesProvider;
use crate::services::make_services;
use crate::views::NotesPage;
use crate::MAIN_CSS;

/// Root component shared by every platform.
#[component]
pub fn NotesApp(config: NotesConfig) -> Element {
    let services = use_hook(|| {
        make_services(config.clone()).map_err(|e| {
            tracing::error!("Failed to open the note store: {}", e);
            e.to_string()
        })
    });

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        match services {
            Ok(services) => rsx! {
                NotesProvider {
                    services,
                    NotesPage {}
                }
            },
            Err(message) => rsx! {
                div {
                    class: "login",
                    h1 { "Notes" }
                    p { class: "error", "Failed to open the note store: {message}" }
                }
            },
        }
    }
}
