use dioxus::prelude::*;

use crate::auth::LoginButton;

/// Signed-out screen.
#[component]
pub fn LoginView() -> Element {
    rsx! {
        div {
            class: "login",
            h1 { "Notes" }
            LoginButton { class: "btn-primary" }
        }
    }
}
