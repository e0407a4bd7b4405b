// Tab strip module - pure logic, no Tauri imports.
// Tracks tab order, the active tab and the labels shown in the tab bar.

use serde::Serialize;

/// Tab labels longer than this are cut and suffixed with `...`.
pub const MAX_LABEL_CHARS: usize = 15;

pub const NEW_TAB_LABEL: &str = "New Tab";
pub const SOURCE_TAB_LABEL: &str = "Page Source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TabKind {
    Web,
    Source,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: u64,
    pub webview_label: String,
    pub kind: TabKind,
    pub title: String,
    pub label: String,
    pub url: String,
}

impl Tab {
    pub fn new(id: u64, kind: TabKind, label: &str, url: &str) -> Self {
        let prefix = match kind {
            TabKind::Web => "tab",
            TabKind::Source => "source",
        };
        Self {
            id,
            webview_label: format!("{}-{}", prefix, id),
            kind,
            title: label.to_string(),
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

/// Result of asking the strip to close a tab.
#[derive(Debug)]
pub enum CloseOutcome {
    /// The last remaining tab is never closed.
    Blocked,
    NotFound,
    Closed { removed: Tab, activated: Option<u64> },
}

/// Cuts a page title down to the tab bar budget.
pub fn tab_label(title: &str) -> String {
    let title = title.trim();
    if title.chars().count() > MAX_LABEL_CHARS {
        let head: String = title.chars().take(MAX_LABEL_CHARS).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

#[derive(Debug, Default)]
pub struct TabStrip {
    tabs: Vec<Tab>,
    active: Option<u64>,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_id(&self) -> Option<u64> {
        self.active
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: u64) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn by_label(&self, webview_label: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.webview_label == webview_label)
    }

    /// The window's Page Source tab, if one is open.
    pub fn source_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.kind == TabKind::Source)
    }

    /// Appends a tab and makes it active. Returns its index.
    pub fn push(&mut self, tab: Tab) -> usize {
        self.active = Some(tab.id);
        self.tabs.push(tab);
        self.tabs.len() - 1
    }

    pub fn activate(&mut self, id: u64) -> bool {
        if self.get(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Removes a tab unless it is the only one left.
    /// Closing the active tab selects its right neighbour, or the new last tab.
    pub fn close(&mut self, id: u64) -> CloseOutcome {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return CloseOutcome::NotFound;
        };
        if self.tabs.len() <= 1 {
            return CloseOutcome::Blocked;
        }

        let removed = self.tabs.remove(index);
        let activated = if self.active == Some(id) {
            let next = self.tabs[index.min(self.tabs.len() - 1)].id;
            self.active = Some(next);
            Some(next)
        } else {
            None
        };

        CloseOutcome::Closed { removed, activated }
    }

    /// Stores the full title and refreshes the tab label. Blank titles are ignored.
    pub fn set_title(&mut self, id: u64, title: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        match self.tabs.iter_mut().find(|t| t.id == id) {
            Some(tab) => {
                tab.title = title.to_string();
                tab.label = tab_label(title);
                true
            }
            None => false,
        }
    }

    pub fn set_url(&mut self, id: u64, url: &str) -> bool {
        match self.tabs.iter_mut().find(|t| t.id == id) {
            Some(tab) if tab.url != url => {
                tab.url = url.to_string();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create_test_strip(count: u64) -> TabStrip {
        let mut strip = TabStrip::new();
        for id in 1..=count {
            strip.push(Tab::new(id, TabKind::Web, NEW_TAB_LABEL, "https://example.com/"));
        }
        strip
    }

    #[rstest]
    #[case("Short", "Short")]
    #[case("Exactly15Chars!", "Exactly15Chars!")]
    #[case("Sixteen chars ok", "Sixteen chars o...")]
    #[case("Rust Programming Language", "Rust Programmin...")]
    #[case("  padded  ", "padded")]
    #[case("Ünïcödé títlé wïth áccents", "Ünïcödé títlé w...")]
    fn test_tab_label(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(tab_label(title), expected);
    }

    #[test]
    fn test_push_activates_new_tab() {
        let mut strip = create_test_strip(2);
        assert_eq!(strip.active_id(), Some(2));

        let index = strip.push(Tab::new(3, TabKind::Web, "Home", "https://example.org/"));
        assert_eq!(index, 2);
        assert_eq!(strip.active_id(), Some(3));
        assert_eq!(strip.active().unwrap().webview_label, "tab-3");
    }

    #[test]
    fn test_closing_last_tab_is_blocked() {
        let mut strip = create_test_strip(1);
        assert!(matches!(strip.close(1), CloseOutcome::Blocked));
        assert_eq!(strip.len(), 1);
        assert_eq!(strip.active_id(), Some(1));
    }

    #[test]
    fn test_tab_count_never_drops_below_one() {
        let mut strip = create_test_strip(4);
        for id in 1..=4 {
            strip.close(id);
        }
        assert_eq!(strip.len(), 1);
        assert_eq!(strip.active_id(), Some(4));
    }

    #[test]
    fn test_closing_active_tab_selects_right_neighbour() {
        let mut strip = create_test_strip(3);
        strip.activate(2);

        match strip.close(2) {
            CloseOutcome::Closed { removed, activated } => {
                assert_eq!(removed.id, 2);
                assert_eq!(activated, Some(3));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(strip.active_id(), Some(3));
    }

    #[test]
    fn test_closing_active_last_tab_selects_left_neighbour() {
        let mut strip = create_test_strip(3);

        match strip.close(3) {
            CloseOutcome::Closed { activated, .. } => assert_eq!(activated, Some(2)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_closing_background_tab_keeps_active() {
        let mut strip = create_test_strip(3);

        match strip.close(1) {
            CloseOutcome::Closed { activated, .. } => assert_eq!(activated, None),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(strip.active_id(), Some(3));
    }

    #[test]
    fn test_close_unknown_tab() {
        let mut strip = create_test_strip(2);
        assert!(matches!(strip.close(42), CloseOutcome::NotFound));
        assert_eq!(strip.len(), 2);
    }

    #[test]
    fn test_set_title_truncates_label() {
        let mut strip = create_test_strip(1);
        assert!(strip.set_title(1, "A very long page title indeed"));

        let tab = strip.get(1).unwrap();
        assert_eq!(tab.title, "A very long page title indeed");
        assert_eq!(tab.label, "A very long pag...");
    }

    #[test]
    fn test_blank_title_keeps_label() {
        let mut strip = create_test_strip(1);
        assert!(!strip.set_title(1, "   "));
        assert_eq!(strip.get(1).unwrap().label, NEW_TAB_LABEL);
    }

    #[test]
    fn test_set_url_reports_changes_only() {
        let mut strip = create_test_strip(1);
        assert!(!strip.set_url(1, "https://example.com/"));
        assert!(strip.set_url(1, "https://example.com/next"));
        assert_eq!(strip.active().unwrap().url, "https://example.com/next");
    }

    #[test]
    fn test_source_tab_lookup() {
        let mut strip = create_test_strip(1);
        assert!(strip.source_tab().is_none());

        strip.push(Tab::new(2, TabKind::Source, SOURCE_TAB_LABEL, "view-source:https://example.com/"));
        let source = strip.source_tab().unwrap();
        assert_eq!(source.webview_label, "source-2");
        assert_eq!(strip.by_label("source-2").unwrap().id, 2);

        strip.close(2);
        assert!(strip.source_tab().is_none());
    }
}
