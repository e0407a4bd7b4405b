// Window and tab lifecycle on top of the Tauri multi-webview API.
// Locks on AppState are released before calling back into the webview runtime.

use std::path::PathBuf;

use serde::Serialize;
use tauri::webview::{DownloadEvent, PageLoadEvent};
use tauri::window::WindowBuilder;
use tauri::{
    AppHandle, Emitter, Manager, PhysicalPosition, PhysicalSize, Position, Rect, Size, WebviewBuilder,
    WebviewUrl, Window, WindowEvent, Wry,
};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use url::Url;

use crate::error::{Error, Result};
use crate::modules::devtools::DevToolsDock;
use crate::modules::layout::{self, Bounds, Layout};
use crate::modules::navigation::interpret_input;
use crate::modules::page::{self, CapturePurpose, PAGE_BRIDGE_JS};
use crate::modules::tabs::{CloseOutcome, Tab, TabKind, SOURCE_TAB_LABEL};
use crate::settings::{Settings, DEFAULT_HOME_URL};
use crate::state::{chrome_label, devtools_label, AppState, BrowserWindow, SETTINGS_LABEL};

pub const WINDOW_TITLE: &str = "Velocity Browser";
pub const HOME_TAB_LABEL: &str = "Home";
pub const NEW_WINDOW_TAB_LABEL: &str = "New Window";

#[derive(Serialize, Clone)]
struct PageSourcePayload {
    html: String,
}

fn to_rect(bounds: Bounds) -> Rect {
    Rect {
        position: Position::Physical(PhysicalPosition::new(bounds.x, bounds.y)),
        size: Size::Physical(PhysicalSize::new(bounds.width, bounds.height)),
    }
}

fn current_layout(window: &Window, dock: &DevToolsDock) -> Result<Layout> {
    let size = window.inner_size()?;
    let scale = window.scale_factor()?;
    Ok(layout::compute(size.width, size.height, scale, dock))
}

/// The configured home page, run through the URL bar heuristic so a bare
/// host like `example.com` still works.
pub fn home_url(app: &AppHandle) -> Result<Url> {
    let settings = app
        .state::<AppState>()
        .settings
        .read()
        .map(|s| s.clone())
        .unwrap_or_else(|_| Settings::default());
    match interpret_input(&settings.home_url, &settings) {
        Some(nav) => Ok(nav.into_url()),
        None => Ok(Url::parse(DEFAULT_HOME_URL)?),
    }
}

/// Opens a browser window with a single tab: the given link, or the home page.
pub fn open_window(app: &AppHandle, first_tab: Option<Url>) -> Result<String> {
    let state = app.state::<AppState>();
    let label = format!("browser-{}", state.next_id());

    let window = WindowBuilder::new(app, &label)
        .title(WINDOW_TITLE)
        .inner_size(1200.0, 800.0)
        .position(100.0, 100.0)
        .build()?;

    state.windows.lock()?.insert(label.clone(), BrowserWindow::new(&label));

    let layout = current_layout(&window, &DevToolsDock::default())?;
    let chrome = WebviewBuilder::new(chrome_label(&label), WebviewUrl::App("index.html".into()));
    window.add_child(
        chrome,
        PhysicalPosition::new(layout.chrome.x, layout.chrome.y),
        PhysicalSize::new(layout.chrome.width, layout.chrome.height),
    )?;

    let panel = WebviewBuilder::new(devtools_label(&label), WebviewUrl::App("devtools.html".into()));
    let panel = window.add_child(
        panel,
        PhysicalPosition::new(0, layout.content.y),
        PhysicalSize::new(1, layout.content.height),
    )?;
    panel.hide()?;

    let handle = app.clone();
    let window_label = label.clone();
    window.on_window_event(move |event| match event {
        WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
            if let Err(e) = apply_layout(&handle, &window_label) {
                log::warn!("[Window] Failed to lay out {}: {}", window_label, e);
            }
        }
        WindowEvent::Destroyed => forget_window(&handle, &window_label),
        _ => {}
    });

    match first_tab {
        Some(url) => open_tab(app, &label, url, NEW_WINDOW_TAB_LABEL)?,
        None => open_tab(app, &label, home_url(app)?, HOME_TAB_LABEL)?,
    };

    log::info!("[Window] Opened {}", label);
    Ok(label)
}

fn forget_window(app: &AppHandle, window_label: &str) {
    let state = app.state::<AppState>();
    let removed = match state.windows.lock() {
        Ok(mut windows) => windows.remove(window_label),
        Err(_) => None,
    };
    if let Some(browser) = removed {
        if let Ok(mut sources) = state.page_sources.lock() {
            for tab in browser.tabs.tabs() {
                sources.remove(&tab.webview_label);
            }
        }
        log::info!("[Window] Closed {} with {} tab(s)", window_label, browser.tabs.len());
    }
}

/// Opens a web tab and makes it active.
pub fn open_tab(app: &AppHandle, window_label: &str, url: Url, label: &str) -> Result<u64> {
    let state = app.state::<AppState>();
    let tab = Tab::new(state.next_id(), TabKind::Web, label, url.as_str());
    log::info!("[Tabs] Opening {} at {}", tab.webview_label, url);

    let builder = WebviewBuilder::<Wry>::new(&tab.webview_label, WebviewUrl::External(url))
        .initialization_script(PAGE_BRIDGE_JS)
        .on_page_load(|webview, payload| {
            if matches!(payload.event(), PageLoadEvent::Started | PageLoadEvent::Finished) {
                if let Err(e) = sync_url(webview.app_handle(), webview.label(), payload.url().as_str()) {
                    log::warn!("[Tabs] Failed to sync url of {}: {}", webview.label(), e);
                }
            }
        })
        .on_download(|webview, event| {
            match event {
                DownloadEvent::Requested { url, destination } => {
                    log::info!("[Downloads] {} requested {} -> {:?}", webview.label(), url, destination);
                }
                DownloadEvent::Finished { url, path, success } => {
                    if success {
                        log::info!("[Downloads] Finished {} -> {:?}", url, path);
                    } else {
                        log::warn!("[Downloads] Failed {}", url);
                    }
                }
                _ => {}
            }
            true
        });

    insert_tab(app, window_label, tab, builder)
}

fn insert_tab(app: &AppHandle, window_label: &str, tab: Tab, builder: WebviewBuilder<Wry>) -> Result<u64> {
    let state = app.state::<AppState>();
    let window = app
        .get_window(window_label)
        .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;

    let (previous, dock) = {
        let windows = state.windows.lock()?;
        let browser = windows
            .get(window_label)
            .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
        (
            browser.tabs.active().map(|t| t.webview_label.clone()),
            browser.devtools.clone(),
        )
    };

    let layout = current_layout(&window, &dock)?;
    window.add_child(
        builder,
        PhysicalPosition::new(layout.content.x, layout.content.y),
        PhysicalSize::new(layout.content.width, layout.content.height),
    )?;
    if let Some(webview) = previous.and_then(|label| app.get_webview(&label)) {
        webview.hide()?;
    }

    let id = tab.id;
    state
        .windows
        .lock()?
        .get_mut(window_label)
        .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?
        .tabs
        .push(tab);

    emit_chrome(app, window_label)?;
    Ok(id)
}

/// Positions chrome, active tab and dock panel; hides background tabs.
pub fn apply_layout(app: &AppHandle, window_label: &str) -> Result<()> {
    let Some(window) = app.get_window(window_label) else {
        return Ok(());
    };
    let state = app.state::<AppState>();
    let (dock, active, background) = {
        let windows = state.windows.lock()?;
        let Some(browser) = windows.get(window_label) else {
            return Ok(());
        };
        let active = browser.tabs.active().map(|t| t.webview_label.clone());
        let background: Vec<String> = browser
            .tabs
            .tabs()
            .iter()
            .filter(|t| Some(&t.webview_label) != active.as_ref())
            .map(|t| t.webview_label.clone())
            .collect();
        (browser.devtools.clone(), active, background)
    };

    let layout = current_layout(&window, &dock)?;

    if let Some(chrome) = app.get_webview(&chrome_label(window_label)) {
        chrome.set_bounds(to_rect(layout.chrome))?;
    }
    for label in background {
        if let Some(webview) = app.get_webview(&label) {
            webview.hide()?;
        }
    }
    if let Some(webview) = active.and_then(|label| app.get_webview(&label)) {
        webview.set_bounds(to_rect(layout.content))?;
        webview.show()?;
    }
    if let Some(panel) = app.get_webview(&devtools_label(window_label)) {
        match layout.devtools {
            Some(bounds) => {
                panel.set_bounds(to_rect(bounds))?;
                panel.show()?;
            }
            None => panel.hide()?,
        }
    }
    Ok(())
}

/// Pushes tab bar and URL bar state to the window's chrome, and the inspected
/// tab to its dock panel while the dock is open.
pub fn emit_chrome(app: &AppHandle, window_label: &str) -> Result<()> {
    let state = app.state::<AppState>();
    let (chrome, inspected) = {
        let windows = state.windows.lock()?;
        let Some(browser) = windows.get(window_label) else {
            return Ok(());
        };
        let inspected = browser
            .devtools
            .is_open()
            .then(|| browser.inspected_tab())
            .flatten();
        (browser.chrome_state(), inspected)
    };
    app.emit_to(chrome_label(window_label), "chrome-state", chrome)?;
    if let Some(inspected) = inspected {
        app.emit_to(devtools_label(window_label), "inspected-tab", inspected)?;
    }
    Ok(())
}

/// Runs `update` on the tab behind `webview_label`; re-emits the chrome if it
/// reports a change.
fn update_tab<F>(app: &AppHandle, webview_label: &str, update: F) -> Result<()>
where
    F: FnOnce(&mut BrowserWindow, u64) -> bool,
{
    let state = app.state::<AppState>();
    let Some(window_label) = state.window_of_webview(webview_label) else {
        return Ok(());
    };
    let changed = {
        let mut windows = state.windows.lock()?;
        let Some(browser) = windows.get_mut(&window_label) else {
            return Ok(());
        };
        let Some(id) = browser.tabs.by_label(webview_label).map(|t| t.id) else {
            return Ok(());
        };
        update(browser, id)
    };
    if changed {
        emit_chrome(app, &window_label)?;
    }
    Ok(())
}

pub fn sync_url(app: &AppHandle, webview_label: &str, url: &str) -> Result<()> {
    update_tab(app, webview_label, |browser, id| browser.tabs.set_url(id, url))
}

pub fn sync_title(app: &AppHandle, webview_label: &str, title: &str) -> Result<()> {
    update_tab(app, webview_label, |browser, id| browser.tabs.set_title(id, title))
}

pub fn activate_tab(app: &AppHandle, window_label: &str, id: u64) -> Result<()> {
    let state = app.state::<AppState>();
    {
        let mut windows = state.windows.lock()?;
        let browser = windows
            .get_mut(window_label)
            .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
        if !browser.tabs.activate(id) {
            return Err(Error::UnknownTab(id.to_string()));
        }
    }
    apply_layout(app, window_label)?;
    emit_chrome(app, window_label)
}

pub fn close_tab(app: &AppHandle, window_label: &str, id: u64) -> Result<()> {
    let state = app.state::<AppState>();
    let removed = {
        let mut windows = state.windows.lock()?;
        let browser = windows
            .get_mut(window_label)
            .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
        match browser.tabs.close(id) {
            CloseOutcome::Blocked => {
                log::debug!("[Tabs] Refusing to close the last tab of {}", window_label);
                return Ok(());
            }
            CloseOutcome::NotFound => return Err(Error::UnknownTab(id.to_string())),
            CloseOutcome::Closed { removed, .. } => {
                browser.devtools.forget(removed.id);
                browser.pending_saves.remove(&removed.webview_label);
                removed
            }
        }
    };

    if removed.kind == TabKind::Source {
        state.page_sources.lock()?.remove(&removed.webview_label);
    }
    if let Some(webview) = app.get_webview(&removed.webview_label) {
        webview.close()?;
    }
    log::info!("[Tabs] Closed {} in {}", removed.webview_label, window_label);

    apply_layout(app, window_label)?;
    emit_chrome(app, window_label)
}

/// Active tab of a window, if it is a web tab.
fn active_web_tab(app: &AppHandle, window_label: &str) -> Result<Option<Tab>> {
    let state = app.state::<AppState>();
    let windows = state.windows.lock()?;
    let browser = windows
        .get(window_label)
        .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
    Ok(browser.tabs.active().filter(|t| t.kind == TabKind::Web).cloned())
}

pub fn navigate_active(app: &AppHandle, window_label: &str, url: Url) -> Result<()> {
    let Some(tab) = active_web_tab(app, window_label)? else {
        log::debug!("[Navigation] Active tab of {} is not a web tab", window_label);
        return Ok(());
    };
    if let Some(webview) = app.get_webview(&tab.webview_label) {
        log::info!("[Navigation] {} -> {}", tab.webview_label, url);
        webview.navigate(url)?;
    }
    Ok(())
}

pub fn eval_active(app: &AppHandle, window_label: &str, script: &str) -> Result<()> {
    if let Some(tab) = active_web_tab(app, window_label)? {
        if let Some(webview) = app.get_webview(&tab.webview_label) {
            webview.eval(script)?;
        }
    }
    Ok(())
}

pub fn view_page_source(app: &AppHandle, window_label: &str) -> Result<()> {
    // With the source tab itself active there is nothing new to capture.
    match active_web_tab(app, window_label)? {
        Some(_) => eval_active(app, window_label, &page::capture_script(CapturePurpose::Source)),
        None => Ok(()),
    }
}

/// Fills the window's Page Source tab with `html`, creating the tab if needed.
pub fn show_page_source(app: &AppHandle, window_label: &str, page_url: &str, html: String) -> Result<()> {
    let state = app.state::<AppState>();
    let existing = {
        let mut windows = state.windows.lock()?;
        let browser = windows
            .get_mut(window_label)
            .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
        let existing = browser.tabs.source_tab().map(|t| (t.id, t.webview_label.clone()));
        if let Some((id, _)) = &existing {
            browser.tabs.set_url(*id, &page::source_url(page_url));
        }
        existing
    };

    match existing {
        Some((id, label)) => {
            state.page_sources.lock()?.insert(label.clone(), html.clone());
            app.emit_to(label, "page-source", PageSourcePayload { html })?;
            activate_tab(app, window_label, id)
        }
        None => {
            let tab = Tab::new(
                state.next_id(),
                TabKind::Source,
                SOURCE_TAB_LABEL,
                &page::source_url(page_url),
            );
            state.page_sources.lock()?.insert(tab.webview_label.clone(), html);
            let builder = WebviewBuilder::new(&tab.webview_label, WebviewUrl::App("source.html".into()));
            insert_tab(app, window_label, tab, builder).map(|_| ())
        }
    }
}

/// Asks for a destination, then snapshots the active tab into it.
pub fn save_page(app: &AppHandle, window_label: &str) -> Result<()> {
    let Some(tab) = active_web_tab(app, window_label)? else {
        return Ok(());
    };

    let handle = app.clone();
    let window_label = window_label.to_string();
    app.dialog()
        .file()
        .set_title("Save Page As")
        .add_filter("HTML Files", &["html"])
        .set_file_name(page::suggested_file_name(&tab.title))
        .save_file(move |path| {
            let Some(path) = path.and_then(|p| p.into_path().ok()) else {
                return;
            };
            if let Err(e) = request_save(&handle, &window_label, &tab.webview_label, path) {
                log::warn!("[Save] Failed to start save of {}: {}", tab.webview_label, e);
            }
        });
    Ok(())
}

fn request_save(app: &AppHandle, window_label: &str, webview_label: &str, path: PathBuf) -> Result<()> {
    let path = page::ensure_html_extension(path);
    {
        let state = app.state::<AppState>();
        let mut windows = state.windows.lock()?;
        let browser = windows
            .get_mut(window_label)
            .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
        browser.pending_saves.insert(webview_label.to_string(), path);
    }
    if let Some(webview) = app.get_webview(webview_label) {
        webview.eval(&page::capture_script(CapturePurpose::Save))?;
    }
    Ok(())
}

/// Routes a document snapshot coming back from a tab page.
pub fn handle_capture(
    app: &AppHandle,
    webview_label: &str,
    purpose: CapturePurpose,
    page_url: &str,
    html: String,
) -> Result<()> {
    let state = app.state::<AppState>();
    let window_label = state
        .window_of_webview(webview_label)
        .ok_or_else(|| Error::UnknownTab(webview_label.to_string()))?;

    match purpose {
        CapturePurpose::Source => show_page_source(app, &window_label, page_url, html),
        CapturePurpose::Save => {
            let path = {
                let mut windows = state.windows.lock()?;
                windows
                    .get_mut(&window_label)
                    .and_then(|b| b.pending_saves.remove(webview_label))
            };
            match path {
                Some(path) => match page::write_snapshot(&path, &html) {
                    Ok(()) => log::info!("[Save] Wrote {} to {:?}", page_url, path),
                    Err(e) => {
                        log::error!("[Save] Failed to write {:?}: {}", path, e);
                        app.dialog()
                            .message(format!("Could not save the page to {}:\n{}", path.display(), e))
                            .title("Save Page As")
                            .kind(MessageDialogKind::Error)
                            .show(|_| {});
                        return Err(e.into());
                    }
                },
                None => log::debug!("[Save] Unrequested snapshot from {}", webview_label),
            }
            Ok(())
        }
    }
}

pub fn open_dev_tools(app: &AppHandle, window_label: &str) -> Result<()> {
    let state = app.state::<AppState>();
    {
        let mut windows = state.windows.lock()?;
        let browser = windows
            .get_mut(window_label)
            .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
        let Some(id) = browser.tabs.active_id() else {
            return Ok(());
        };
        if !browser.devtools.open(id) {
            return Ok(());
        }
    }
    log::info!("[DevTools] Docked inspector in {}", window_label);
    apply_layout(app, window_label)?;
    emit_chrome(app, window_label)
}

pub fn close_dev_tools(app: &AppHandle, window_label: &str) -> Result<()> {
    let state = app.state::<AppState>();
    let was_open = {
        let mut windows = state.windows.lock()?;
        windows
            .get_mut(window_label)
            .map(|b| b.devtools.close())
            .unwrap_or(false)
    };
    if was_open {
        log::info!("[DevTools] Closed inspector in {}", window_label);
        apply_layout(app, window_label)?;
        emit_chrome(app, window_label)?;
    }
    Ok(())
}

/// Opens the engine's own inspector for the docked tab.
pub fn open_web_inspector(app: &AppHandle, window_label: &str) -> Result<()> {
    let label = {
        let state = app.state::<AppState>();
        let windows = state.windows.lock()?;
        windows.get(window_label).and_then(|b| {
            let id = b.devtools.inspected()?;
            b.tabs.get(id).map(|t| t.webview_label.clone())
        })
    };
    if let Some(webview) = label.and_then(|l| app.get_webview(&l)) {
        webview.open_devtools();
    }
    Ok(())
}

/// Shows the settings window, focusing it if it is already open.
pub fn show_settings_window(app: &AppHandle) {
    if let Some(win) = app.get_webview_window(SETTINGS_LABEL) {
        let _ = win.set_focus();
        return;
    }

    let settings_window = tauri::WebviewWindowBuilder::new(
        app,
        SETTINGS_LABEL,
        WebviewUrl::App("settings.html".into()),
    )
    .title("Settings")
    .inner_size(420.0, 260.0)
    .resizable(false)
    .minimizable(false)
    .maximizable(false)
    .center()
    .focused(true)
    .build();

    if let Err(e) = settings_window {
        log::error!("[Settings] Failed to create settings window: {}", e);
    }
}
