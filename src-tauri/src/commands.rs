// Tauri commands invoked by the chrome, the tab pages and the auxiliary pages.
// Commands that create webviews are async so they never run on the event loop
// thread while it waits on them.

use serde::Serialize;
use tauri::{AppHandle, Emitter, State, Webview};
use url::Url;

use crate::browser;
use crate::error::{Error, Result};
use crate::menus;
use crate::modules::navigation::interpret_input;
use crate::modules::page::CapturePurpose;
use crate::modules::tabs::NEW_TAB_LABEL;
use crate::settings::{SearchEngine, Settings};
use crate::state::{AppState, ChromeState, InspectedTab, WebviewRole};

fn window_of(webview: &Webview) -> String {
    webview.window().label().to_string()
}

/// Refuses the call unless it comes from one of `allowed`. The capability files
/// already scope commands per webview; this keeps a page from driving the
/// chrome even if a capability is widened later.
fn require(webview: &Webview, allowed: &[WebviewRole]) -> Result<()> {
    check_role(webview.label(), allowed)
}

fn check_role(label: &str, allowed: &[WebviewRole]) -> Result<()> {
    if allowed.contains(&WebviewRole::of(label)) {
        Ok(())
    } else {
        log::warn!("[IPC] Refused command from {}", label);
        Err(Error::Forbidden(label.to_string()))
    }
}

const CHROME: &[WebviewRole] = &[WebviewRole::Chrome];
const PAGE: &[WebviewRole] = &[WebviewRole::Tab];
const DOCK: &[WebviewRole] = &[WebviewRole::DevTools];
const SOURCE: &[WebviewRole] = &[WebviewRole::Source];
const CHROME_OR_DOCK: &[WebviewRole] = &[WebviewRole::Chrome, WebviewRole::DevTools];
const SETTINGS: &[WebviewRole] = &[WebviewRole::Settings];

// --- Chrome ---

#[tauri::command]
pub fn chrome_ready(webview: Webview, state: State<'_, AppState>) -> Result<ChromeState> {
    require(&webview, CHROME)?;
    let window = window_of(&webview);
    let windows = state.windows.lock()?;
    windows
        .get(&window)
        .map(|w| w.chrome_state())
        .ok_or(Error::UnknownWindow(window))
}

#[tauri::command]
pub fn navigate_to(app: AppHandle, webview: Webview, state: State<'_, AppState>, text: String) -> Result<()> {
    require(&webview, CHROME)?;
    let settings = state.settings.read()?.clone();
    match interpret_input(&text, &settings) {
        Some(nav) => {
            log::debug!("[Navigation] {:?} from {:?}", nav, text);
            browser::navigate_active(&app, &window_of(&webview), nav.into_url())
        }
        None => Ok(()),
    }
}

#[tauri::command]
pub fn go_back(app: AppHandle, webview: Webview) -> Result<()> {
    require(&webview, CHROME)?;
    browser::eval_active(&app, &window_of(&webview), "window.history.back()")
}

#[tauri::command]
pub fn go_forward(app: AppHandle, webview: Webview) -> Result<()> {
    require(&webview, CHROME)?;
    browser::eval_active(&app, &window_of(&webview), "window.history.forward()")
}

#[tauri::command]
pub fn reload(app: AppHandle, webview: Webview) -> Result<()> {
    require(&webview, CHROME)?;
    browser::eval_active(&app, &window_of(&webview), "window.location.reload()")
}

#[tauri::command]
pub fn go_home(app: AppHandle, webview: Webview) -> Result<()> {
    require(&webview, CHROME)?;
    let url = browser::home_url(&app)?;
    browser::navigate_active(&app, &window_of(&webview), url)
}

#[tauri::command]
pub async fn new_tab(app: AppHandle, webview: Webview) -> Result<u64> {
    require(&webview, CHROME)?;
    let url = browser::home_url(&app)?;
    browser::open_tab(&app, &window_of(&webview), url, NEW_TAB_LABEL)
}

#[tauri::command]
pub fn close_tab(app: AppHandle, webview: Webview, id: u64) -> Result<()> {
    require(&webview, CHROME)?;
    browser::close_tab(&app, &window_of(&webview), id)
}

#[tauri::command]
pub fn select_tab(app: AppHandle, webview: Webview, id: u64) -> Result<()> {
    require(&webview, CHROME)?;
    browser::activate_tab(&app, &window_of(&webview), id)
}

#[tauri::command]
pub fn show_app_menu(app: AppHandle, webview: Webview) -> Result<()> {
    require(&webview, CHROME)?;
    menus::show_app_menu(&app, &window_of(&webview))
}

// --- Tab pages ---

#[tauri::command]
pub fn page_title_changed(app: AppHandle, webview: Webview, title: String) -> Result<()> {
    require(&webview, PAGE)?;
    browser::sync_title(&app, webview.label(), &title)
}

#[tauri::command]
pub fn page_url_changed(app: AppHandle, webview: Webview, url: String) -> Result<()> {
    require(&webview, PAGE)?;
    browser::sync_url(&app, webview.label(), &url)
}

#[tauri::command]
pub fn page_context_menu(
    app: AppHandle,
    webview: Webview,
    link_url: Option<String>,
    x: f64,
    y: f64,
) -> Result<()> {
    require(&webview, PAGE)?;
    // Only links we could open in a tab get the link entries.
    let link = link_url
        .as_deref()
        .and_then(|l| Url::parse(l).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|u| u.to_string());
    menus::show_context_menu(&app, &window_of(&webview), link.as_deref(), x, y)
}

#[tauri::command]
pub async fn page_captured(
    app: AppHandle,
    webview: Webview,
    purpose: CapturePurpose,
    url: String,
    html: String,
) -> Result<()> {
    require(&webview, PAGE)?;
    browser::handle_capture(&app, webview.label(), purpose, &url, html)
}

// --- Page Source tab ---

#[tauri::command]
pub fn get_page_source(webview: Webview, state: State<'_, AppState>) -> Result<Option<String>> {
    require(&webview, SOURCE)?;
    Ok(state.page_sources.lock()?.get(webview.label()).cloned())
}

// --- Developer tools dock ---

#[tauri::command]
pub fn open_dev_tools(app: AppHandle, webview: Webview) -> Result<()> {
    require(&webview, CHROME_OR_DOCK)?;
    browser::open_dev_tools(&app, &window_of(&webview))
}

#[tauri::command]
pub fn close_dev_tools(app: AppHandle, webview: Webview) -> Result<()> {
    require(&webview, CHROME_OR_DOCK)?;
    browser::close_dev_tools(&app, &window_of(&webview))
}

#[tauri::command]
pub fn inspected_tab(webview: Webview, state: State<'_, AppState>) -> Result<Option<InspectedTab>> {
    require(&webview, DOCK)?;
    let windows = state.windows.lock()?;
    Ok(windows.get(&window_of(&webview)).and_then(|w| w.inspected_tab()))
}

#[tauri::command]
pub fn open_web_inspector(app: AppHandle, webview: Webview) -> Result<()> {
    require(&webview, DOCK)?;
    browser::open_web_inspector(&app, &window_of(&webview))
}

// --- Settings ---

#[derive(Serialize, Clone)]
pub struct EngineOption {
    pub id: SearchEngine,
    pub name: &'static str,
}

#[tauri::command]
pub fn get_settings(webview: Webview, state: State<'_, AppState>) -> Result<Settings> {
    require(&webview, SETTINGS)?;
    Ok(state.settings.read()?.clone())
}

#[tauri::command]
pub fn list_search_engines(webview: Webview) -> Result<Vec<EngineOption>> {
    require(&webview, SETTINGS)?;
    Ok(SearchEngine::ALL
        .into_iter()
        .map(|engine| EngineOption { id: engine, name: engine.name() })
        .collect())
}

fn update_settings<F>(app: &AppHandle, state: &AppState, update: F) -> Result<()>
where
    F: FnOnce(&mut Settings),
{
    let settings = {
        let mut settings = state.settings.write()?;
        update(&mut settings);
        settings.clone()
    };
    // Settings last for the session only; nothing is written to disk.
    app.emit("settings-changed", &settings)?;
    Ok(())
}

#[tauri::command]
pub fn set_search_engine(app: AppHandle, webview: Webview, state: State<'_, AppState>, name: String) -> Result<()> {
    require(&webview, SETTINGS)?;
    let Some(engine) = SearchEngine::from_name(&name) else {
        log::warn!("[Settings] Unknown search engine {:?}", name);
        return Ok(());
    };
    log::info!("[Settings] Search engine set to {}", engine.name());
    update_settings(&app, &state, |s| s.search_engine = engine)
}

#[tauri::command]
pub fn set_home_url(app: AppHandle, webview: Webview, state: State<'_, AppState>, url: String) -> Result<()> {
    require(&webview, SETTINGS)?;
    let url = url.trim().to_string();
    if url.is_empty() {
        return Ok(());
    }
    log::info!("[Settings] Home URL set to {}", url);
    update_settings(&app, &state, |s| s.home_url = url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_cannot_drive_the_chrome() {
        assert!(matches!(check_role("tab-3", CHROME), Err(Error::Forbidden(label)) if label == "tab-3"));
        assert!(check_role("tab-3", SETTINGS).is_err());
        assert!(check_role("tab-3", DOCK).is_err());
        assert!(check_role("tab-3", SOURCE).is_err());
        assert!(check_role("tab-3", CHROME_OR_DOCK).is_err());
    }

    #[test]
    fn test_pages_can_report_to_the_shell() {
        assert!(check_role("tab-3", PAGE).is_ok());
        assert!(check_role("browser-1-chrome", PAGE).is_err());
    }

    #[test]
    fn test_each_page_reaches_its_own_commands() {
        assert!(check_role("browser-1-chrome", CHROME).is_ok());
        assert!(check_role("browser-1-chrome", CHROME_OR_DOCK).is_ok());
        assert!(check_role("browser-1-devtools", CHROME_OR_DOCK).is_ok());
        assert!(check_role("browser-1-devtools", DOCK).is_ok());
        assert!(check_role("source-2", SOURCE).is_ok());
        assert!(check_role("settings", SETTINGS).is_ok());
        assert!(check_role("browser-1-devtools", CHROME).is_err());
        assert!(check_role("source-2", SETTINGS).is_err());
    }

    #[test]
    fn test_forbidden_error_is_readable() {
        let err = check_role("tab-3", CHROME).unwrap_err();
        assert_eq!(err.to_string(), "`tab-3` may not call this command");
    }
}
