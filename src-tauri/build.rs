// Declaring the app commands makes tauri-build generate an `allow-<command>`
// permission for each one, so capabilities grant them per webview instead of
// every page reaching every command.
const COMMANDS: &[&str] = &[
    "chrome_ready",
    "navigate_to",
    "go_back",
    "go_forward",
    "reload",
    "go_home",
    "new_tab",
    "close_tab",
    "select_tab",
    "show_app_menu",
    "page_title_changed",
    "page_url_changed",
    "page_context_menu",
    "page_captured",
    "get_page_source",
    "open_dev_tools",
    "close_dev_tools",
    "inspected_tab",
    "open_web_inspector",
    "get_settings",
    "list_search_engines",
    "set_search_engine",
    "set_home_url",
];

fn main() {
    tauri_build::try_build(
        tauri_build::Attributes::new()
            .app_manifest(tauri_build::AppManifest::new().commands(COMMANDS)),
    )
    .expect("failed to run tauri-build");
}
