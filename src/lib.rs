//! SunoShell - Library Root
//!
//! A thin desktop shell around the Suno web application:
//! - Splash screen and timed hand-off to the main window
//! - Icon fetch-and-cache (best-effort, first run only)
//! - Download interception with a native save dialog
//! - Static application menu with update/about actions

pub mod assets;
pub mod downloads;
pub mod menu;
pub mod splash;
pub mod startup;
pub mod window;

use tauri::Manager;

/// Initialize and run the Tauri application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing();

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            // A second launch must never create a second main window; hand
            // focus to the one that exists.
            if let Some(window) = app.get_webview_window(window::MAIN_WINDOW_LABEL) {
                let _ = window.show();
                let _ = window.set_focus();
            }
        }))
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            app.manage(downloads::DownloadBroker::new());
            app.manage(menu::ZoomLevel::new());

            // Splash, icon fetch, delay and main window all run off the
            // event loop from here.
            startup::spawn(app.handle());

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
