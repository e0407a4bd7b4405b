// Pure navigation logic - no Tauri imports allowed.
// This module turns URL bar text into a navigation target and can be unit tested.

use url::Url;
use crate::settings::Settings;

/// Where a line of URL bar input leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Absolute http(s) URL, loaded as typed.
    Direct(Url),
    /// Dotted text without spaces, treated as a host.
    BareHost(Url),
    /// Everything else goes to the configured search engine.
    Search(Url),
}

impl Navigation {
    pub fn into_url(self) -> Url {
        match self {
            Self::Direct(u) | Self::BareHost(u) | Self::Search(u) => u,
        }
    }
}

/// Interprets free text typed into the URL bar.
///
/// This is a local string heuristic only: no DNS lookups, no reachability checks.
/// Returns `None` for blank input.
pub fn interpret_input(input: &str, settings: &Settings) -> Option<Navigation> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = Url::parse(trimmed);

    // 1. Full http(s) URL
    if let Ok(u) = &parsed {
        if matches!(u.scheme(), "http" | "https") {
            return Some(Navigation::Direct(u.clone()));
        }
    }

    // 2. Dot and no space -> host. Keep an explicit scheme, otherwise use http.
    // A dotted "scheme" is really a host with a port, as in `example.com:8080`.
    if trimmed.contains('.') && !trimmed.contains(' ') {
        if let Ok(u) = &parsed {
            if !u.scheme().contains('.') {
                return Some(Navigation::BareHost(u.clone()));
            }
        }
        if let Ok(u) = Url::parse(&format!("http://{}", trimmed)) {
            if u.host().is_some() {
                return Some(Navigation::BareHost(u));
            }
        }
    }

    // 3. Search
    Url::parse(&settings.search_engine.query_url(trimmed))
        .ok()
        .map(Navigation::Search)
}
