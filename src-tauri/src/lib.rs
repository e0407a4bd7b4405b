// Velocity Browser library entry point.
// Exposes all modules so main.rs stays a thin launcher and the logic can be
// tested independently.

use tauri::Manager;

pub mod browser;
pub mod commands;
pub mod error;
pub mod menus;
pub mod settings;
pub mod state;

// Pure logic modules (no Tauri imports)
pub mod modules;

use settings::Settings;
use state::AppState;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let log_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            log::info!("[Window] Second launch, opening a new window");
            if let Err(e) = browser::open_window(app, None) {
                log::error!("[Window] Failed to open window: {}", e);
            }
        }))
        .plugin(tauri_plugin_log::Builder::default().level(log_level).build())
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let handle = app.handle().clone();
            let settings = Settings::default();
            log::info!(
                "[Settings] Home {} / search {}",
                settings.home_url,
                settings.search_engine.name()
            );
            app.manage(AppState::new(settings));

            app.on_menu_event(|app_handle, event| {
                menus::handle_menu_event(app_handle, event.id().0.as_str());
            });

            browser::open_window(&handle, None)?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::chrome_ready,
            commands::navigate_to,
            commands::go_back,
            commands::go_forward,
            commands::reload,
            commands::go_home,
            commands::new_tab,
            commands::close_tab,
            commands::select_tab,
            commands::show_app_menu,
            commands::page_title_changed,
            commands::page_url_changed,
            commands::page_context_menu,
            commands::page_captured,
            commands::get_page_source,
            commands::open_dev_tools,
            commands::close_dev_tools,
            commands::inspected_tab,
            commands::open_web_inspector,
            commands::get_settings,
            commands::list_search_engines,
            commands::set_search_engine,
            commands::set_home_url
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
