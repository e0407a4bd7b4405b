use serde::{Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Tauri(#[from] tauri::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Clipboard(#[from] tauri_plugin_clipboard_manager::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unknown window `{0}`")]
    UnknownWindow(String),
    #[error("unknown tab `{0}`")]
    UnknownTab(String),
    #[error("`{0}` may not call this command")]
    Forbidden(String),
    #[error("browser state lock poisoned")]
    Poisoned,
}

// Commands hand errors back to the frontend as plain strings.
impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
