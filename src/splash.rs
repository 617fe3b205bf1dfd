//! Splash screen shown while the remote interface warms up.
//!
//! The splash is a frameless always-on-top card rendered from inline HTML,
//! so it needs no bundled assets. The orchestrator holds the only handle to
//! it and is the only component allowed to close it.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tauri::image::Image;
use tauri::{AppHandle, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

pub const SPLASH_WINDOW_LABEL: &str = "splash";

const SPLASH_HTML: &str = r#"<body style="background:#111;color:#fff;display:flex;align-items:center;justify-content:center;font-family:sans-serif;">
  <div>
    <h2>SunoShell</h2>
    <p>Loading Suno interface...</p>
  </div>
</body>"#;

fn splash_url() -> Url {
    let encoded = utf8_percent_encode(SPLASH_HTML, NON_ALPHANUMERIC).to_string();
    Url::parse(&format!("data:text/html,{encoded}"))
        .expect("static splash markup always forms a valid data URL")
}

/// Creates the splash window: fixed 400×300, frameless, centered, always on
/// top, transparent background. Uses the cached icon when present.
pub fn show_splash<R: Runtime>(
    app: &AppHandle<R>,
    icon: Option<Image<'static>>,
) -> tauri::Result<WebviewWindow<R>> {
    let mut builder =
        WebviewWindowBuilder::new(app, SPLASH_WINDOW_LABEL, WebviewUrl::External(splash_url()))
            .title("SunoShell")
            .inner_size(400.0, 300.0)
            .resizable(false)
            .decorations(false)
            .always_on_top(true)
            .transparent(true)
            .center();

    if let Some(icon) = icon {
        builder = builder.icon(icon)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splash_markup_encodes_to_a_valid_data_url() {
        let url = splash_url();
        assert_eq!(url.scheme(), "data");
        assert!(url.as_str().starts_with("data:text/html,"));
    }

    #[test]
    fn splash_markup_carries_the_loading_message() {
        assert!(SPLASH_HTML.contains("SunoShell"));
        assert!(SPLASH_HTML.contains("Loading Suno interface..."));
    }
}
