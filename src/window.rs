//! Main application window
//!
//! One resizable window navigated to the remote login page. Remote content
//! gets script execution but no host IPC (Tauri grants remote origins no
//! command access by default). Download requests are intercepted before the
//! toolkit's default save behavior runs.

use std::path::Path;
use tauri::image::Image;
use tauri::webview::DownloadEvent;
use tauri::{AppHandle, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{downloads, menu};

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Entry page of the remote application.
pub const LOGIN_URL: &str = "https://suno.com/login";

/// Creates the main window, wires download interception into its webview
/// and installs the application menu. Called exactly once per run, by the
/// startup orchestrator.
pub fn show_main_window<R: Runtime>(
    app: &AppHandle<R>,
    icon: Option<Image<'static>>,
) -> tauri::Result<WebviewWindow<R>> {
    let url = Url::parse(LOGIN_URL).expect("login URL is static and well formed");

    let handler_app = app.clone();
    let mut builder = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(url))
        .title("SunoShell")
        .inner_size(1200.0, 800.0)
        .on_download(move |_webview, event| {
            if let DownloadEvent::Requested {
                url, destination, ..
            } = event
            {
                let suggested = suggested_name(destination, &url);
                downloads::spawn_flow(&handler_app, url, suggested);
                // The flow owns the destination choice; never let the
                // toolkit write to its default path.
                return false;
            }
            true
        });

    if let Some(icon) = icon {
        builder = builder.icon(icon)?;
    }

    let window = builder.build()?;

    app.set_menu(menu::build_menu(app)?)?;
    app.on_menu_event(menu::handle_menu_event);

    Ok(window)
}

/// Filename pre-filled into the save dialog: the toolkit's suggestion when
/// it has one, else the last URL path segment.
fn suggested_name(destination: &Path, url: &Url) -> String {
    destination
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| downloads::suggested_filename(url))
}
