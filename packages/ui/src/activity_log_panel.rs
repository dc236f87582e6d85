use dioxus::prelude::*;

use crate::activity_log::use_activity_log;

const ACTIVITY_LOG_CSS: Asset = asset!("/assets/activity_log.css");
const MAX_SHOWN: usize = 20;

/// The most recent confirmations and failures, newest first.
#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();

    if !log().visible {
        return rsx! {};
    }

    let rows: Vec<(String, String, String)> = log()
        .recent(MAX_SHOWN)
        .map(|e| {
            (
                format!("activity-log-entry {}", e.level.class()),
                e.time_label(),
                e.message.clone(),
            )
        })
        .collect();

    rsx! {
        document::Stylesheet { href: ACTIVITY_LOG_CSS }

        aside {
            class: "activity-log-panel",
            header {
                class: "activity-log-header",
                span { "Activity" }
                div {
                    class: "activity-log-header-actions",
                    button { onclick: move |_| log.write().clear(), "Clear" }
                    button { onclick: move |_| log.write().visible = false, "Close" }
                }
            }
            ul {
                class: "activity-log-entries",
                if rows.is_empty() {
                    li { class: "activity-log-empty", "Nothing yet." }
                }
                for (class, at, message) in rows {
                    li {
                        class,
                        time { class: "activity-log-time", "{at}" }
                        span { " {message}" }
                    }
                }
            }
        }
    }
}

/// Top-bar button opening the panel, with the number of failures so far.
#[component]
pub fn ActivityLogToggle() -> Element {
    let mut log = use_activity_log();
    let errors = log().error_count();
    let class = if errors > 0 {
        "activity-log-toggle has-errors"
    } else {
        "activity-log-toggle"
    };

    rsx! {
        button {
            class,
            title: "Activity",
            onclick: move |_| log.write().toggle(),
            if errors > 0 { "Activity ({errors})" } else { "Activity" }
        }
    }
}
