// Session settings. They live in AppState for the lifetime of the process and
// are only changed from the settings window.

use serde::Serialize;
use url::form_urlencoded;

pub const DEFAULT_HOME_URL: &str = "https://www.google.com";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum SearchEngine {
    #[default]
    DuckDuckGo,
    Google,
    Bing,
    Brave,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 4] = [
        Self::DuckDuckGo,
        Self::Google,
        Self::Bing,
        Self::Brave,
    ];

    /// Name shown in the settings dropdown.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Google => "Google",
            Self::Bing => "Bing",
            Self::Brave => "Brave",
        }
    }

    /// URL template; `{}` is replaced by the encoded query.
    pub fn template(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "https://duckduckgo.com/?q={}",
            Self::Google => "https://www.google.com/search?q={}",
            Self::Bing => "https://www.bing.com/search?q={}",
            Self::Brave => "https://search.brave.com/search?q={}",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|engine| engine.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Form-encodes the query (spaces become `+`) into the template.
    pub fn query_url(&self, query: &str) -> String {
        let q: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.template().replacen("{}", &q, 1)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Settings {
    pub home_url: String,
    pub search_engine: SearchEngine,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home_url: DEFAULT_HOME_URL.to_string(),
            search_engine: SearchEngine::default(),
        }
    }
}
