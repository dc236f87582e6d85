//! Sign-in and sign-out buttons.

use dioxus::prelude::*;
use store::{AuthError, SessionProvider};

use crate::activity_log::{log_activity, use_activity_log, LogLevel};
use crate::provider::use_services;

/// Button that starts sign-in. A failed or cancelled sign-in leaves the user
/// signed out.
#[component]
pub fn LoginButton(
    #[props(default = "Sign in".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let services = use_services();
    let mut loading = use_signal(|| false);
    let mut activity_log = use_activity_log();

    let onclick = move |_| {
        let session = services.session.clone();
        async move {
            loading.set(true);
            match session.sign_in().await {
                Ok(()) => {}
                Err(AuthError::Cancelled) => {
                    tracing::info!("Sign-in cancelled");
                    log_activity(
                        &mut activity_log,
                        LogLevel::Warning,
                        "Sign-in cancelled: no [profile] in notes.toml",
                    );
                }
                Err(e) => {
                    tracing::error!("Sign-in failed: {}", e);
                    log_activity(&mut activity_log, LogLevel::Error, &e.to_string());
                }
            }
            loading.set(false);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick: onclick,
            if loading() {
                "Signing in..."
            } else {
                "{label}"
            }
        }
    }
}

/// Button to sign the current user out.
#[component]
pub fn LogoutButton(
    #[props(default = "Log Out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let services = use_services();
    let mut activity_log = use_activity_log();

    let onclick = move |_| {
        let session = services.session.clone();
        async move {
            if let Err(e) = session.sign_out().await {
                tracing::error!("Sign-out failed: {}", e);
                log_activity(&mut activity_log, LogLevel::Error, &e.to_string());
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
