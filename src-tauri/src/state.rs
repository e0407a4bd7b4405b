// Shared state structs, managed by Tauri and used from every command.
// These can be tested independently of a running app.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use serde::Serialize;

use crate::modules::devtools::DevToolsDock;
use crate::modules::tabs::TabStrip;
use crate::settings::Settings;

/// One native browser window and everything shown inside it.
#[derive(Debug)]
pub struct BrowserWindow {
    pub label: String,
    pub tabs: TabStrip,
    pub devtools: DevToolsDock,
    /// Save destinations waiting for a snapshot, keyed by tab webview label.
    pub pending_saves: HashMap<String, PathBuf>,
}

impl BrowserWindow {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            tabs: TabStrip::new(),
            devtools: DevToolsDock::default(),
            pending_saves: HashMap::new(),
        }
    }

    pub fn chrome_state(&self) -> ChromeState {
        let closable = self.tabs.len() > 1;
        ChromeState {
            tabs: self
                .tabs
                .tabs()
                .iter()
                .map(|t| TabView {
                    id: t.id,
                    label: t.label.clone(),
                    title: t.title.clone(),
                    closable,
                })
                .collect(),
            active_tab_id: self.tabs.active_id(),
            url: self.tabs.active().map(|t| t.url.clone()).unwrap_or_default(),
            dev_tools_open: self.devtools.is_open(),
        }
    }

    pub fn inspected_tab(&self) -> Option<InspectedTab> {
        let tab = self.tabs.get(self.devtools.inspected()?)?;
        Some(InspectedTab {
            id: tab.id,
            title: tab.title.clone(),
            url: tab.url.clone(),
        })
    }
}

pub fn chrome_label(window: &str) -> String {
    format!("{}-chrome", window)
}

pub fn devtools_label(window: &str) -> String {
    format!("{}-devtools", window)
}

pub const SETTINGS_LABEL: &str = "settings";

/// What a webview is, judged from its label. Commands use it to refuse calls
/// from webviews that have no business making them, remote pages above all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebviewRole {
    Chrome,
    DevTools,
    Tab,
    Source,
    Settings,
    Unknown,
}

impl WebviewRole {
    pub fn of(label: &str) -> Self {
        if label == SETTINGS_LABEL {
            Self::Settings
        } else if label.starts_with("tab-") {
            Self::Tab
        } else if label.starts_with("source-") {
            Self::Source
        } else if label.starts_with("browser-") && label.ends_with("-chrome") {
            Self::Chrome
        } else if label.starts_with("browser-") && label.ends_with("-devtools") {
            Self::DevTools
        } else {
            Self::Unknown
        }
    }
}

/// Everything the toolbar and tab bar render.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChromeState {
    pub tabs: Vec<TabView>,
    pub active_tab_id: Option<u64>,
    pub url: String,
    pub dev_tools_open: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabView {
    pub id: u64,
    pub label: String,
    pub title: String,
    pub closable: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspectedTab {
    pub id: u64,
    pub title: String,
    pub url: String,
}

pub struct AppState {
    pub settings: Arc<RwLock<Settings>>,
    pub windows: Arc<Mutex<HashMap<String, BrowserWindow>>>,
    /// Page Source contents, keyed by source webview label.
    pub page_sources: Arc<Mutex<HashMap<String, String>>>,
    next_id: AtomicU64,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            windows: Arc::new(Mutex::new(HashMap::new())),
            page_sources: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Ids are shared by windows and tabs so webview labels never collide.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Finds the window owning a tab or source webview.
    pub fn window_of_webview(&self, webview_label: &str) -> Option<String> {
        let windows = self.windows.lock().ok()?;
        windows
            .values()
            .find(|w| w.tabs.by_label(webview_label).is_some())
            .map(|w| w.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::tabs::{Tab, TabKind};
    use rstest::rstest;

    fn create_test_window(label: &str) -> BrowserWindow {
        let mut window = BrowserWindow::new(label);
        window.tabs.push(Tab::new(1, TabKind::Web, "Home", "https://example.com/"));
        window
    }

    #[test]
    fn test_labels() {
        assert_eq!(chrome_label("browser-1"), "browser-1-chrome");
        assert_eq!(devtools_label("browser-1"), "browser-1-devtools");
    }

    #[rstest]
    #[case("browser-1-chrome", WebviewRole::Chrome)]
    #[case("browser-12-devtools", WebviewRole::DevTools)]
    #[case("tab-3", WebviewRole::Tab)]
    #[case("source-4", WebviewRole::Source)]
    #[case("settings", WebviewRole::Settings)]
    #[case("tab-chrome", WebviewRole::Tab)]
    #[case("evil-chrome", WebviewRole::Unknown)]
    #[case("", WebviewRole::Unknown)]
    fn test_webview_role(#[case] label: &str, #[case] expected: WebviewRole) {
        assert_eq!(WebviewRole::of(label), expected);
    }

    #[test]
    fn test_window_labels_have_roles() {
        assert_eq!(WebviewRole::of(&chrome_label("browser-1")), WebviewRole::Chrome);
        assert_eq!(WebviewRole::of(&devtools_label("browser-1")), WebviewRole::DevTools);
        let tab = Tab::new(5, TabKind::Web, "Home", "https://example.com/");
        assert_eq!(WebviewRole::of(&tab.webview_label), WebviewRole::Tab);
        let source = Tab::new(6, TabKind::Source, "Page Source", "");
        assert_eq!(WebviewRole::of(&source.webview_label), WebviewRole::Source);
    }

    #[test]
    fn test_single_tab_is_not_closable() {
        let window = create_test_window("browser-1");
        let state = window.chrome_state();
        assert_eq!(state.tabs.len(), 1);
        assert!(!state.tabs[0].closable);
        assert_eq!(state.url, "https://example.com/");
        assert_eq!(state.active_tab_id, Some(1));
        assert!(!state.dev_tools_open);
    }

    #[test]
    fn test_chrome_state_follows_active_tab() {
        let mut window = create_test_window("browser-1");
        window.tabs.push(Tab::new(2, TabKind::Web, "New Tab", "https://example.org/"));

        let state = window.chrome_state();
        assert!(state.tabs.iter().all(|t| t.closable));
        assert_eq!(state.url, "https://example.org/");

        window.tabs.activate(1);
        assert_eq!(window.chrome_state().url, "https://example.com/");
    }

    #[test]
    fn test_inspected_tab() {
        let mut window = create_test_window("browser-1");
        assert_eq!(window.inspected_tab(), None);

        window.devtools.open(1);
        let inspected = window.inspected_tab().unwrap();
        assert_eq!(inspected.id, 1);
        assert_eq!(inspected.url, "https://example.com/");
    }

    #[test]
    fn test_window_of_webview() {
        let state = AppState::new(Settings::default());
        state
            .windows
            .lock()
            .unwrap()
            .insert("browser-1".into(), create_test_window("browser-1"));

        assert_eq!(state.window_of_webview("tab-1").as_deref(), Some("browser-1"));
        assert_eq!(state.window_of_webview("tab-9"), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let state = AppState::new(Settings::default());
        let a = state.next_id();
        let b = state.next_id();
        assert_ne!(a, b);
    }
}
