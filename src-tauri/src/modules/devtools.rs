// Developer tools dock state - pure logic.

/// Width shares of (tabs, panel) while the dock is open.
pub const OPEN_SPLIT: (u32, u32) = (800, 400);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DevToolsDock {
    open: bool,
    inspected: Option<u64>,
}

impl DevToolsDock {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Tab the panel is attached to.
    pub fn inspected(&self) -> Option<u64> {
        self.inspected
    }

    /// Returns false if the dock was already open on the same tab.
    pub fn open(&mut self, tab_id: u64) -> bool {
        let changed = !self.open || self.inspected != Some(tab_id);
        self.open = true;
        self.inspected = Some(tab_id);
        changed
    }

    pub fn close(&mut self) -> bool {
        let was_open = self.open;
        self.open = false;
        was_open
    }

    /// Forgets a closed tab. The dock itself stays where it is.
    pub fn forget(&mut self, tab_id: u64) {
        if self.inspected == Some(tab_id) {
            self.inspected = None;
        }
    }

    /// Splits `width` between tab content and the panel.
    pub fn split(&self, width: u32) -> (u32, u32) {
        if !self.open {
            return (width, 0);
        }
        let (tabs, panel) = OPEN_SPLIT;
        let content = (u64::from(width) * u64::from(tabs) / u64::from(tabs + panel)) as u32;
        (content, width - content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_dock_gives_full_width() {
        let dock = DevToolsDock::default();
        assert!(!dock.is_open());
        assert_eq!(dock.split(1200), (1200, 0));
    }

    #[test]
    fn test_open_dock_splits_two_thirds() {
        let mut dock = DevToolsDock::default();
        assert!(dock.open(7));
        assert_eq!(dock.inspected(), Some(7));
        assert_eq!(dock.split(1200), (800, 400));
        assert_eq!(dock.split(1001), (667, 334));
    }

    #[test]
    fn test_reopen_on_same_tab_is_unchanged() {
        let mut dock = DevToolsDock::default();
        dock.open(1);
        assert!(!dock.open(1));
        assert!(dock.open(2));
    }

    #[test]
    fn test_close_and_forget() {
        let mut dock = DevToolsDock::default();
        dock.open(3);
        dock.forget(4);
        assert_eq!(dock.inspected(), Some(3));
        dock.forget(3);
        assert_eq!(dock.inspected(), None);

        assert!(dock.close());
        assert!(!dock.close());
        assert_eq!(dock.split(900), (900, 0));
    }
}
