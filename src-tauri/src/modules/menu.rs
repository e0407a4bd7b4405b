// Menu item ids - pure logic.
// Native menu events only carry an id string, so the id has to say which
// window the menu belongs to and what to do, including any link target.

const PREFIX: &str = "velocity";
const SEP: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    NewTab,
    NewWindow,
    Back,
    Forward,
    Reload,
    SavePage,
    ViewSource,
    Inspect,
    Settings,
    Quit,
    OpenLinkInNewTab(String),
    OpenLinkInNewWindow(String),
    CopyLink(String),
}

impl MenuAction {
    fn key(&self) -> &'static str {
        match self {
            Self::NewTab => "new-tab",
            Self::NewWindow => "new-window",
            Self::Back => "back",
            Self::Forward => "forward",
            Self::Reload => "reload",
            Self::SavePage => "save-page",
            Self::ViewSource => "view-source",
            Self::Inspect => "inspect",
            Self::Settings => "settings",
            Self::Quit => "quit",
            Self::OpenLinkInNewTab(_) => "open-link-tab",
            Self::OpenLinkInNewWindow(_) => "open-link-window",
            Self::CopyLink(_) => "copy-link",
        }
    }

    fn link(&self) -> Option<&str> {
        match self {
            Self::OpenLinkInNewTab(l) | Self::OpenLinkInNewWindow(l) | Self::CopyLink(l) => Some(l),
            _ => None,
        }
    }

    fn from_parts(key: &str, link: Option<&str>) -> Option<Self> {
        let action = match (key, link) {
            ("new-tab", None) => Self::NewTab,
            ("new-window", None) => Self::NewWindow,
            ("back", None) => Self::Back,
            ("forward", None) => Self::Forward,
            ("reload", None) => Self::Reload,
            ("save-page", None) => Self::SavePage,
            ("view-source", None) => Self::ViewSource,
            ("inspect", None) => Self::Inspect,
            ("settings", None) => Self::Settings,
            ("quit", None) => Self::Quit,
            ("open-link-tab", Some(l)) => Self::OpenLinkInNewTab(l.to_string()),
            ("open-link-window", Some(l)) => Self::OpenLinkInNewWindow(l.to_string()),
            ("copy-link", Some(l)) => Self::CopyLink(l.to_string()),
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCommand {
    pub window: String,
    pub action: MenuAction,
}

impl MenuCommand {
    pub fn new(window: &str, action: MenuAction) -> Self {
        Self { window: window.to_string(), action }
    }

    pub fn id(&self) -> String {
        let mut id = format!("{PREFIX}{SEP}{}{SEP}{}", self.window, self.action.key());
        if let Some(link) = self.action.link() {
            id.push(SEP);
            id.push_str(link);
        }
        id
    }

    /// Decodes an id made by [`MenuCommand::id`]. Foreign ids give `None`.
    pub fn parse(id: &str) -> Option<Self> {
        // The link comes last, so it may contain the separator itself.
        let mut parts = id.splitn(4, SEP);
        if parts.next()? != PREFIX {
            return None;
        }
        let window = parts.next().filter(|w| !w.is_empty())?;
        let key = parts.next()?;
        let action = MenuAction::from_parts(key, parts.next())?;
        Some(Self::new(window, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MenuAction::NewTab)]
    #[case(MenuAction::SavePage)]
    #[case(MenuAction::Inspect)]
    #[case(MenuAction::OpenLinkInNewTab("https://example.com/a".into()))]
    #[case(MenuAction::OpenLinkInNewWindow("https://example.com/?q=a|b".into()))]
    #[case(MenuAction::CopyLink("https://example.com/#x".into()))]
    fn test_id_round_trip(#[case] action: MenuAction) {
        let command = MenuCommand::new("browser-1", action);
        assert_eq!(MenuCommand::parse(&command.id()), Some(command));
    }

    #[test]
    fn test_id_format() {
        let command = MenuCommand::new("browser-2", MenuAction::CopyLink("https://a.b/".into()));
        assert_eq!(command.id(), "velocity|browser-2|copy-link|https://a.b/");
    }

    #[rstest]
    #[case("settings")]
    #[case("other|browser-1|new-tab")]
    #[case("velocity||new-tab")]
    #[case("velocity|browser-1|explode")]
    #[case("velocity|browser-1|open-link-tab")]
    #[case("velocity|browser-1|reload|https://a.b/")]
    fn test_foreign_or_malformed_ids(#[case] id: &str) {
        assert_eq!(MenuCommand::parse(id), None);
    }
}
