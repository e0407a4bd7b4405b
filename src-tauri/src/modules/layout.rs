// Window geometry - pure logic, physical pixels in and out.

use crate::modules::devtools::DevToolsDock;

pub const TAB_BAR_HEIGHT: f64 = 34.0;
pub const TOOLBAR_HEIGHT: f64 = 40.0;
pub const MIN_CONTENT_HEIGHT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub chrome: Bounds,
    pub content: Bounds,
    /// `None` while the dock is closed.
    pub devtools: Option<Bounds>,
}

/// Lays out the chrome strip on top, tab content below it and the dev tools
/// panel to the right of the content.
pub fn compute(width: u32, height: u32, scale_factor: f64, dock: &DevToolsDock) -> Layout {
    let chrome_height = ((TAB_BAR_HEIGHT + TOOLBAR_HEIGHT) * scale_factor) as u32;
    let content_height = height.saturating_sub(chrome_height).max(MIN_CONTENT_HEIGHT);
    let (content_width, panel_width) = dock.split(width);

    let chrome = Bounds { x: 0, y: 0, width, height: chrome_height };
    let content = Bounds {
        x: 0,
        y: chrome_height as i32,
        width: content_width,
        height: content_height,
    };
    let devtools = dock.is_open().then(|| Bounds {
        x: content_width as i32,
        y: chrome_height as i32,
        width: panel_width,
        height: content_height,
    });

    Layout { chrome, content, devtools }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 74)]
    #[case(2.0, 148)]
    #[case(1.5, 111)]
    fn test_chrome_height_scales(#[case] scale: f64, #[case] expected: u32) {
        let layout = compute(1200, 800, scale, &DevToolsDock::default());
        assert_eq!(layout.chrome.height, expected);
        assert_eq!(layout.content.y, expected as i32);
    }

    #[test]
    fn test_closed_dock_layout() {
        let layout = compute(1200, 800, 1.0, &DevToolsDock::default());
        assert_eq!(layout.content, Bounds { x: 0, y: 74, width: 1200, height: 726 });
        assert_eq!(layout.devtools, None);
    }

    #[test]
    fn test_open_dock_layout() {
        let mut dock = DevToolsDock::default();
        dock.open(1);
        let layout = compute(1200, 800, 1.0, &dock);
        assert_eq!(layout.content.width, 800);
        assert_eq!(layout.devtools, Some(Bounds { x: 800, y: 74, width: 400, height: 726 }));
    }

    #[test]
    fn test_content_height_has_floor() {
        let layout = compute(400, 120, 1.0, &DevToolsDock::default());
        assert_eq!(layout.content.height, MIN_CONTENT_HEIGHT);
    }
}
