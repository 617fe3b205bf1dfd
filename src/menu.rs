//! Application menu for SunoShell
//!
//! The menu is described as a tagged-variant tree built by a pure function,
//! then materialized into toolkit menu items. Standard entries map to
//! predefined (role) items; the two Help entries and the View zoom/reload
//! entries carry ids dispatched by [`handle_menu_event`].

use std::sync::atomic::{AtomicI32, Ordering};
use tauri::menu::{
    IsMenuItem, Menu, MenuEvent, MenuItem, MenuItemKind, PredefinedMenuItem, Submenu,
};
use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_shell::ShellExt;

use crate::window::{LOGIN_URL, MAIN_WINDOW_LABEL};

/// Repository opened by "Check for Updates" and the About dialog.
pub const REPO_URL: &str = "https://www.github.com/SomeGuru/SunoShell/";

pub const CHECK_UPDATES_ID: &str = "check-updates";
pub const ABOUT_ID: &str = "about";
pub const RELOAD_ID: &str = "reload";
pub const TOGGLE_DEVTOOLS_ID: &str = "toggle-devtools";
pub const ZOOM_RESET_ID: &str = "zoom-reset";
pub const ZOOM_IN_ID: &str = "zoom-in";
pub const ZOOM_OUT_ID: &str = "zoom-out";

const ABOUT_DETAIL: &str = "\
Created by: Mike Larios
License: MIT

Copyright Notice:
Logos and services are trademarked and owned by Suno and therefore all rights are reserved.
Mike Larios and Suno are not responsible for misuse or copyright infringement based on this SunoShell Application.

GitHub: https://www.github.com/SomeGuru/SunoShell/
Original URL: https://suno.com/login";

/// Standard menu entries backed by toolkit predefined items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRole {
    Quit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Minimize,
    CloseWindow,
    Fullscreen,
}

/// One node of the declarative menu tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Role {
        role: MenuRole,
        label: Option<&'static str>,
    },
    Separator,
    Submenu {
        label: &'static str,
        items: Vec<MenuNode>,
    },
    Action {
        id: &'static str,
        label: &'static str,
    },
}

impl MenuNode {
    fn role(role: MenuRole) -> Self {
        MenuNode::Role { role, label: None }
    }
}

/// Builds the static menu tree. Pure: no hidden state, rebuilding yields an
/// identical tree every time.
pub fn menu_template() -> Vec<MenuNode> {
    vec![
        MenuNode::Submenu {
            label: "File",
            items: vec![MenuNode::Role {
                role: MenuRole::Quit,
                label: Some("Exit"),
            }],
        },
        MenuNode::Submenu {
            label: "Edit",
            items: vec![
                MenuNode::role(MenuRole::Undo),
                MenuNode::role(MenuRole::Redo),
                MenuNode::Separator,
                MenuNode::role(MenuRole::Cut),
                MenuNode::role(MenuRole::Copy),
                MenuNode::role(MenuRole::Paste),
                MenuNode::role(MenuRole::SelectAll),
            ],
        },
        MenuNode::Submenu {
            label: "View",
            items: vec![
                MenuNode::Action {
                    id: RELOAD_ID,
                    label: "Reload",
                },
                MenuNode::Action {
                    id: TOGGLE_DEVTOOLS_ID,
                    label: "Toggle Developer Tools",
                },
                MenuNode::Separator,
                MenuNode::Action {
                    id: ZOOM_RESET_ID,
                    label: "Actual Size",
                },
                MenuNode::Action {
                    id: ZOOM_IN_ID,
                    label: "Zoom In",
                },
                MenuNode::Action {
                    id: ZOOM_OUT_ID,
                    label: "Zoom Out",
                },
                MenuNode::Separator,
                MenuNode::role(MenuRole::Fullscreen),
            ],
        },
        MenuNode::Submenu {
            label: "Window",
            items: vec![
                MenuNode::role(MenuRole::Minimize),
                MenuNode::role(MenuRole::CloseWindow),
            ],
        },
        MenuNode::Submenu {
            label: "Help",
            items: vec![
                MenuNode::Action {
                    id: CHECK_UPDATES_ID,
                    label: "Check for Updates",
                },
                MenuNode::Action {
                    id: ABOUT_ID,
                    label: "About SunoShell",
                },
            ],
        },
    ]
}

/// Materializes the template into the application menu.
pub fn build_menu<R: Runtime>(app: &AppHandle<R>) -> tauri::Result<Menu<R>> {
    let items = menu_template()
        .iter()
        .map(|node| build_item(app, node))
        .collect::<tauri::Result<Vec<_>>>()?;
    let refs: Vec<&dyn IsMenuItem<R>> = items.iter().map(|k| k as &dyn IsMenuItem<R>).collect();
    Menu::with_items(app, &refs)
}

fn build_item<R: Runtime>(app: &AppHandle<R>, node: &MenuNode) -> tauri::Result<MenuItemKind<R>> {
    Ok(match node {
        MenuNode::Separator => MenuItemKind::Predefined(PredefinedMenuItem::separator(app)?),
        MenuNode::Role { role, label } => {
            MenuItemKind::Predefined(predefined_item(app, *role, *label)?)
        }
        MenuNode::Action { id, label } => {
            MenuItemKind::MenuItem(MenuItem::with_id(app, *id, *label, true, None::<&str>)?)
        }
        MenuNode::Submenu { label, items } => {
            let children = items
                .iter()
                .map(|child| build_item(app, child))
                .collect::<tauri::Result<Vec<_>>>()?;
            let refs: Vec<&dyn IsMenuItem<R>> =
                children.iter().map(|k| k as &dyn IsMenuItem<R>).collect();
            MenuItemKind::Submenu(Submenu::with_items(app, *label, true, &refs)?)
        }
    })
}

fn predefined_item<R: Runtime>(
    app: &AppHandle<R>,
    role: MenuRole,
    label: Option<&str>,
) -> tauri::Result<PredefinedMenuItem<R>> {
    match role {
        MenuRole::Quit => PredefinedMenuItem::quit(app, label),
        MenuRole::Undo => PredefinedMenuItem::undo(app, label),
        MenuRole::Redo => PredefinedMenuItem::redo(app, label),
        MenuRole::Cut => PredefinedMenuItem::cut(app, label),
        MenuRole::Copy => PredefinedMenuItem::copy(app, label),
        MenuRole::Paste => PredefinedMenuItem::paste(app, label),
        MenuRole::SelectAll => PredefinedMenuItem::select_all(app, label),
        MenuRole::Minimize => PredefinedMenuItem::minimize(app, label),
        MenuRole::CloseWindow => PredefinedMenuItem::close_window(app, label),
        MenuRole::Fullscreen => PredefinedMenuItem::fullscreen(app, label),
    }
}

/// Webview zoom level, tracked app-wide. Factor is 1.2^level, reset to 0.
#[derive(Debug, Default)]
pub struct ZoomLevel(AtomicI32);

impl ZoomLevel {
    const MIN: i32 = -8;
    const MAX: i32 = 8;

    pub fn new() -> Self {
        Self(AtomicI32::new(0))
    }

    fn shift(&self, delta: i32) -> i32 {
        let previous = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |level| {
                Some((level + delta).clamp(Self::MIN, Self::MAX))
            })
            .unwrap_or(0);
        (previous + delta).clamp(Self::MIN, Self::MAX)
    }

    fn reset(&self) -> i32 {
        self.0.store(0, Ordering::SeqCst);
        0
    }
}

pub fn zoom_factor(level: i32) -> f64 {
    1.2f64.powi(level)
}

/// Which branch the user picked in the About dialog. Button order matches
/// the original: repository, remote application, close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AboutChoice {
    OpenRepository,
    OpenRemoteApp,
    Dismiss,
}

/// Maps a message-box result to a branch. Some backends report custom
/// buttons by label, others by position; both are handled.
pub fn about_choice(result: &rfd::MessageDialogResult) -> AboutChoice {
    match result {
        rfd::MessageDialogResult::Yes => AboutChoice::OpenRepository,
        rfd::MessageDialogResult::No => AboutChoice::OpenRemoteApp,
        rfd::MessageDialogResult::Custom(label) => match label.as_str() {
            "Open GitHub" => AboutChoice::OpenRepository,
            "Open Suno" => AboutChoice::OpenRemoteApp,
            _ => AboutChoice::Dismiss,
        },
        _ => AboutChoice::Dismiss,
    }
}

/// Dispatches application menu events.
pub fn handle_menu_event<R: Runtime>(app: &AppHandle<R>, event: MenuEvent) {
    match event.id.as_ref() {
        CHECK_UPDATES_ID => open_external(app, REPO_URL),
        ABOUT_ID => {
            let app = app.clone();
            tauri::async_runtime::spawn(async move {
                show_about_dialog(app).await;
            });
        }
        RELOAD_ID => {
            if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
                let _ = window.eval("window.location.reload()");
            }
        }
        TOGGLE_DEVTOOLS_ID => {
            if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
                if window.is_devtools_open() {
                    window.close_devtools();
                } else {
                    window.open_devtools();
                }
            }
        }
        ZOOM_RESET_ID => apply_zoom(app, app.state::<ZoomLevel>().reset()),
        ZOOM_IN_ID => apply_zoom(app, app.state::<ZoomLevel>().shift(1)),
        ZOOM_OUT_ID => apply_zoom(app, app.state::<ZoomLevel>().shift(-1)),
        _ => {}
    }
}

fn apply_zoom<R: Runtime>(app: &AppHandle<R>, level: i32) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        if let Err(err) = window.set_zoom(zoom_factor(level)) {
            tracing::debug!("zoom not applied: {err}");
        }
    }
}

/// Modal About box with attribution text and two external-link buttons.
async fn show_about_dialog<R: Runtime>(app: AppHandle<R>) {
    let result = rfd::AsyncMessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title("About SunoShell")
        .set_description(ABOUT_DETAIL)
        .set_buttons(rfd::MessageButtons::YesNoCancelCustom(
            "Open GitHub".to_string(),
            "Open Suno".to_string(),
            "Close".to_string(),
        ))
        .show()
        .await;

    match about_choice(&result) {
        AboutChoice::OpenRepository => open_external(&app, REPO_URL),
        AboutChoice::OpenRemoteApp => open_external(&app, LOGIN_URL),
        AboutChoice::Dismiss => {}
    }
}

/// Fire-and-forget open in the OS default handler.
fn open_external<R: Runtime>(app: &AppHandle<R>, url: &str) {
    if let Err(err) = app.shell().open(url, None) {
        tracing::warn!("failed to open {url}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_deterministic() {
        assert_eq!(menu_template(), menu_template());
    }

    #[test]
    fn template_has_the_five_standard_submenus() {
        let labels: Vec<&str> = menu_template()
            .iter()
            .map(|node| match node {
                MenuNode::Submenu { label, .. } => *label,
                other => panic!("top level must only contain submenus, got {other:?}"),
            })
            .collect();
        assert_eq!(labels, ["File", "Edit", "View", "Window", "Help"]);
    }

    #[test]
    fn help_contains_exactly_the_two_custom_actions() {
        let template = menu_template();
        let help = template
            .iter()
            .find_map(|node| match node {
                MenuNode::Submenu { label: "Help", items } => Some(items),
                _ => None,
            })
            .unwrap();

        let ids: Vec<&str> = help
            .iter()
            .map(|node| match node {
                MenuNode::Action { id, .. } => *id,
                other => panic!("Help must only contain actions, got {other:?}"),
            })
            .collect();
        assert_eq!(ids, [CHECK_UPDATES_ID, ABOUT_ID]);
    }

    #[test]
    fn quit_is_relabeled_exit() {
        let template = menu_template();
        let file = template
            .iter()
            .find_map(|node| match node {
                MenuNode::Submenu { label: "File", items } => Some(items),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            *file,
            vec![MenuNode::Role {
                role: MenuRole::Quit,
                label: Some("Exit"),
            }]
        );
    }

    #[test]
    fn about_buttons_map_by_label() {
        use rfd::MessageDialogResult::*;

        let custom = |s: &str| Custom(s.to_string());
        assert_eq!(
            about_choice(&custom("Open GitHub")),
            AboutChoice::OpenRepository
        );
        assert_eq!(about_choice(&custom("Open Suno")), AboutChoice::OpenRemoteApp);
        assert_eq!(about_choice(&custom("Close")), AboutChoice::Dismiss);
    }

    #[test]
    fn about_buttons_map_by_position() {
        use rfd::MessageDialogResult::*;

        assert_eq!(about_choice(&Yes), AboutChoice::OpenRepository);
        assert_eq!(about_choice(&No), AboutChoice::OpenRemoteApp);
        assert_eq!(about_choice(&Cancel), AboutChoice::Dismiss);
        assert_eq!(about_choice(&Ok), AboutChoice::Dismiss);
    }

    #[test]
    fn zoom_level_shifts_and_clamps() {
        let zoom = ZoomLevel::new();
        assert_eq!(zoom.shift(1), 1);
        assert_eq!(zoom.shift(1), 2);
        assert_eq!(zoom.reset(), 0);
        assert_eq!(zoom.shift(-1), -1);
        for _ in 0..20 {
            zoom.shift(1);
        }
        assert_eq!(zoom.shift(1), ZoomLevel::MAX);
    }

    #[test]
    fn zoom_factor_is_identity_at_level_zero() {
        assert_eq!(zoom_factor(0), 1.0);
        assert!(zoom_factor(1) > 1.0);
        assert!(zoom_factor(-1) < 1.0);
    }
}
