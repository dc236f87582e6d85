//! Context provider wiring the note store into the component tree.

use dioxus::prelude::*;
use store::{NotesView, SessionProvider};

use crate::activity_log::ActivityLog;
use crate::services::Services;

/// The services of the running client.
pub fn use_services() -> Services {
    use_context::<Services>()
}

/// The current render state. Updated on every identity change and snapshot.
pub fn use_notes_view() -> Signal<NotesView> {
    use_context::<Signal<NotesView>>()
}

/// Re-read the store into the view signal after a local change.
pub fn refresh(view: &mut Signal<NotesView>, services: &Services) {
    view.set(services.notes.view());
}

/// Provider component that keeps the note store subscribed to the session's
/// identity and mirrors its state into a signal.
#[component]
pub fn NotesProvider(services: Services, children: Element) -> Element {
    let services = use_context_provider(|| services);
    let mut view = use_context_provider(|| Signal::new(services.notes.view()));
    use_context_provider(|| Signal::new(ActivityLog::default()));

    // Identity changes: resubscribe and re-render in one step
    let follow = services.clone();
    use_future(move || {
        let services = follow.clone();
        async move {
            services
                .notes
                .follow_with(services.session.identity(), |next| view.set(next.clone()))
                .await;
        }
    });

    // Snapshots from the active query
    let feed = services.clone();
    use_future(move || {
        let services = feed.clone();
        async move {
            let mut notes = services.notes.notes();
            while notes.changed().await.is_ok() {
                refresh(&mut view, &services);
            }
        }
    });

    rsx! {
        {children}
    }
}
