// Scripts injected into tab pages and helpers for page snapshots.
// No Tauri imports: the scripts are plain strings, paths are plain paths.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Why a document snapshot was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapturePurpose {
    Source,
    Save,
}

impl CapturePurpose {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Save => "save",
        }
    }
}

/// Runs in the top frame of every tab page. Reports title and URL changes and
/// replaces the engine's context menu with ours.
pub const PAGE_BRIDGE_JS: &str = r#"
(function () {
    if (window.top !== window || window.__VELOCITY_BRIDGE__) return;
    window.__VELOCITY_BRIDGE__ = true;

    function invoke(cmd, args) {
        var ipc = window.__TAURI_INTERNALS__;
        if (ipc) ipc.invoke(cmd, args).catch(function () {});
    }

    var lastTitle = null;
    var lastUrl = null;
    function reportTitle() {
        if (document.title && document.title !== lastTitle) {
            lastTitle = document.title;
            invoke('page_title_changed', { title: document.title });
        }
    }
    function reportUrl() {
        if (location.href !== lastUrl) {
            lastUrl = location.href;
            invoke('page_url_changed', { url: location.href });
        }
    }

    ['pushState', 'replaceState'].forEach(function (name) {
        var original = history[name];
        history[name] = function () {
            var result = original.apply(this, arguments);
            reportUrl();
            return result;
        };
    });
    window.addEventListener('popstate', reportUrl);
    window.addEventListener('hashchange', reportUrl);

    function watch() {
        reportUrl();
        reportTitle();
        new MutationObserver(reportTitle).observe(document.documentElement, {
            subtree: true, childList: true, characterData: true
        });
    }
    if (document.readyState === 'loading') document.addEventListener('DOMContentLoaded', watch);
    else watch();

    document.addEventListener('contextmenu', function (e) {
        var link = e.target && e.target.closest ? e.target.closest('a[href]') : null;
        e.preventDefault();
        invoke('page_context_menu', { linkUrl: link ? link.href : null, x: e.clientX, y: e.clientY });
    }, true);
})();
"#;

/// Script that serializes the current document and hands it back to Rust.
pub fn capture_script(purpose: CapturePurpose) -> String {
    format!(
        r#"
        (function () {{
            var ipc = window.__TAURI_INTERNALS__;
            if (!ipc) return;
            var doctype = document.doctype ? new XMLSerializer().serializeToString(document.doctype) + '\n' : '';
            ipc.invoke('page_captured', {{
                purpose: '{}',
                url: location.href,
                html: doctype + document.documentElement.outerHTML
            }}).catch(function (e) {{
                console.error('page_captured', e);
            }});
        }})();
        "#,
        purpose.as_str()
    )
}

/// Writes a captured document to the path chosen in the save dialog.
pub fn write_snapshot(path: &Path, html: &str) -> io::Result<()> {
    fs::write(path, html)
}

/// URL shown in the URL bar while a Page Source tab is active.
pub fn source_url(page_url: &str) -> String {
    format!("view-source:{}", page_url)
}

/// Appends `.html` unless the path already ends with it.
pub fn ensure_html_extension(path: PathBuf) -> PathBuf {
    let has_html = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("html"))
        .unwrap_or(false);
    if has_html {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(".html");
    PathBuf::from(name)
}

/// Default file name offered by the save dialog.
pub fn suggested_file_name(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "page.html".to_string()
    } else {
        format!("{}.html", cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/tmp/page", "/tmp/page.html")]
    #[case("/tmp/page.html", "/tmp/page.html")]
    #[case("/tmp/page.HTML", "/tmp/page.HTML")]
    #[case("/tmp/page.htm", "/tmp/page.htm.html")]
    #[case("/tmp/archive.v2", "/tmp/archive.v2.html")]
    fn test_ensure_html_extension(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ensure_html_extension(PathBuf::from(input)), PathBuf::from(expected));
    }

    #[rstest]
    #[case("Example Domain", "Example Domain.html")]
    #[case("a/b: c?", "a_b_ c_.html")]
    #[case("   ", "page.html")]
    fn test_suggested_file_name(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(suggested_file_name(title), expected);
    }

    #[test]
    fn test_capture_script_names_purpose() {
        assert!(capture_script(CapturePurpose::Save).contains("purpose: 'save'"));
        assert!(capture_script(CapturePurpose::Source).contains("purpose: 'source'"));
    }

    #[test]
    fn test_capture_script_handles_rejection() {
        let script = capture_script(CapturePurpose::Save);
        assert!(script.contains(".catch(function (e)"));
    }

    #[test]
    fn test_write_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        write_snapshot(&path, "<!DOCTYPE html>\n<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn test_write_snapshot_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("page.html");
        let err = write_snapshot(&path, "<html></html>").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!path.exists());
    }

    #[test]
    fn test_capture_purpose_wire_format() {
        let purpose: CapturePurpose = serde_json::from_str("\"source\"").unwrap();
        assert_eq!(purpose, CapturePurpose::Source);
    }

    #[test]
    fn test_source_url() {
        assert_eq!(source_url("https://example.com/"), "view-source:https://example.com/");
    }
}
