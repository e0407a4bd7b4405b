// Native popup menus: the toolbar "☰" menu and the page context menu.
// Item ids are built by `modules::menu`, decoded again in `handle_menu_event`.

use tauri::menu::{Menu, MenuBuilder};
use tauri::{AppHandle, LogicalPosition, Manager, Wry};
use tauri_plugin_clipboard_manager::ClipboardExt;
use url::Url;

use crate::browser;
use crate::error::{Error, Result};
use crate::modules::layout::{TAB_BAR_HEIGHT, TOOLBAR_HEIGHT};
use crate::modules::menu::{MenuAction, MenuCommand};
use crate::modules::tabs::NEW_TAB_LABEL;

fn id(window: &str, action: MenuAction) -> String {
    MenuCommand::new(window, action).id()
}

fn app_menu(app: &AppHandle, window: &str) -> Result<Menu<Wry>> {
    let menu = MenuBuilder::new(app)
        .text(id(window, MenuAction::NewTab), "New Tab")
        .text(id(window, MenuAction::NewWindow), "New Window")
        .separator()
        .text(id(window, MenuAction::SavePage), "Save Page As...")
        .text(id(window, MenuAction::ViewSource), "View Page Source")
        .text(id(window, MenuAction::Inspect), "Developer Tools")
        .separator()
        .text(id(window, MenuAction::Settings), "Settings...")
        .separator()
        .text(id(window, MenuAction::Quit), "Quit")
        .build()?;
    Ok(menu)
}

fn context_menu(app: &AppHandle, window: &str, link: Option<&str>) -> Result<Menu<Wry>> {
    let mut builder = MenuBuilder::new(app);
    if let Some(link) = link {
        builder = builder
            .text(id(window, MenuAction::OpenLinkInNewTab(link.to_string())), "Open Link in New Tab")
            .text(id(window, MenuAction::OpenLinkInNewWindow(link.to_string())), "Open Link in New Window")
            .text(id(window, MenuAction::CopyLink(link.to_string())), "Copy Link Address")
            .separator();
    }
    let menu = builder
        .text(id(window, MenuAction::Back), "Back")
        .text(id(window, MenuAction::Forward), "Forward")
        .text(id(window, MenuAction::Reload), "Reload")
        .separator()
        .text(id(window, MenuAction::SavePage), "Save Page As...")
        .text(id(window, MenuAction::ViewSource), "View Page Source")
        .separator()
        .text(id(window, MenuAction::Inspect), "Inspect")
        .build()?;
    Ok(menu)
}

pub fn show_app_menu(app: &AppHandle, window_label: &str) -> Result<()> {
    let window = app
        .get_window(window_label)
        .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
    window.popup_menu(&app_menu(app, window_label)?)?;
    Ok(())
}

/// Pops up the page menu at a point given in tab page coordinates.
pub fn show_context_menu(app: &AppHandle, window_label: &str, link: Option<&str>, x: f64, y: f64) -> Result<()> {
    let window = app
        .get_window(window_label)
        .ok_or_else(|| Error::UnknownWindow(window_label.to_string()))?;
    let menu = context_menu(app, window_label, link)?;
    // Tab pages sit right below the chrome strip.
    let position = LogicalPosition::new(x, y + TAB_BAR_HEIGHT + TOOLBAR_HEIGHT);
    window.popup_menu_at(&menu, position)?;
    Ok(())
}

pub fn handle_menu_event(app: &AppHandle, id: &str) {
    let Some(command) = MenuCommand::parse(id) else {
        log::debug!("[Menu] Ignoring foreign menu id {}", id);
        return;
    };
    if let Err(e) = run(app, &command) {
        log::warn!("[Menu] {:?} in {} failed: {}", command.action, command.window, e);
    }
}

fn run(app: &AppHandle, command: &MenuCommand) -> Result<()> {
    let window = command.window.as_str();
    match &command.action {
        MenuAction::NewTab => {
            browser::open_tab(app, window, browser::home_url(app)?, NEW_TAB_LABEL)?;
        }
        MenuAction::NewWindow => {
            browser::open_window(app, None)?;
        }
        MenuAction::Back => browser::eval_active(app, window, "window.history.back()")?,
        MenuAction::Forward => browser::eval_active(app, window, "window.history.forward()")?,
        MenuAction::Reload => browser::eval_active(app, window, "window.location.reload()")?,
        MenuAction::SavePage => browser::save_page(app, window)?,
        MenuAction::ViewSource => browser::view_page_source(app, window)?,
        MenuAction::Inspect => browser::open_dev_tools(app, window)?,
        MenuAction::Settings => browser::show_settings_window(app),
        MenuAction::Quit => app.exit(0),
        MenuAction::OpenLinkInNewTab(link) => {
            browser::open_tab(app, window, Url::parse(link)?, NEW_TAB_LABEL)?;
        }
        MenuAction::OpenLinkInNewWindow(link) => {
            browser::open_window(app, Some(Url::parse(link)?))?;
        }
        MenuAction::CopyLink(link) => app.clipboard().write_text(link.clone())?,
    }
    Ok(())
}
