use dioxus::prelude::*;

fn main() {
    let config = ui::load_config();
    init_logging(&config.log.level);
    dioxus::launch(App);
}

fn init_logging(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    if let Err(e) = dioxus::logger::init(level) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(ui::load_config);

    rsx! {
        ui::NotesApp { config }
    }
}
