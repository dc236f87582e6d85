use dioxus::prelude::*;
use store::Identity;

use crate::activity_log_panel::ActivityLogToggle;
use crate::auth::LogoutButton;

/// Header shown while signed in: app title, the user's name and avatar, log out.
#[component]
pub fn Navbar(identity: Identity) -> Element {
    let name = identity.label().to_string();

    rsx! {
        header {
            class: "navbar",
            h1 { class: "navbar-title", "Notes" }
            div {
                class: "navbar-profile",
                if let Some(url) = identity.avatar_url.clone() {
                    img { class: "navbar-avatar", src: "{url}", alt: "" }
                }
                span { class: "navbar-user", "{name}" }
                ActivityLogToggle {}
                LogoutButton { class: "btn-text" }
            }
        }
    }
}
