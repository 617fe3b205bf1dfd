//! Icon cache for SunoShell
//!
//! Fetches the remote favicon once and keeps it under the app data
//! directory. The fetch is best-effort: startup never waits on a retry and
//! never fails because the icon is missing.

use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tauri::image::Image;
use tauri::{AppHandle, Manager, Runtime};
use thiserror::Error;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Remote location of the application icon.
pub const ICON_URL: &str = "https://suno.com/favicon.ico";

/// Filename of the cached copy inside the app data directory.
pub const ICON_FILENAME: &str = "suno.ico";

#[derive(Error, Debug, Clone)]
pub enum AssetError {
    /// Failure during the request or response streaming.
    #[error("network error: {0}")]
    Network(String),

    /// Failure while writing the icon to disk.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for AssetError {
    fn from(err: reqwest::Error) -> Self {
        AssetError::Network(err.to_string())
    }
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::Io(err.to_string())
    }
}

/// Outcome of [`ensure_icon`]. Failure is a valid outcome; callers proceed
/// either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconStatus {
    /// The cache file already existed; no request was made.
    Cached,
    /// The icon was downloaded and written to the cache path.
    Fetched,
    /// The fetch failed; the cache path is left absent.
    Unavailable,
}

/// Resolves the icon cache path under the app data directory.
pub fn icon_cache_path<R: Runtime>(app: &AppHandle<R>) -> tauri::Result<PathBuf> {
    Ok(app.path().app_data_dir()?.join(ICON_FILENAME))
}

/// Makes sure the icon cache is populated, downloading it on first run.
///
/// Idempotent: if the file exists no request is issued. Any transport or
/// write error is logged and swallowed so startup can continue without the
/// icon; a partial file is removed so the next run retries.
pub async fn ensure_icon(client: &Client, icon_url: &str, cache_path: &Path) -> IconStatus {
    if cache_path.exists() {
        return IconStatus::Cached;
    }

    match fetch_icon(client, icon_url, cache_path).await {
        Ok(()) => IconStatus::Fetched,
        Err(err) => {
            tracing::warn!("Failed to download favicon: {err}");
            let _ = tokio::fs::remove_file(cache_path).await;
            IconStatus::Unavailable
        }
    }
}

async fn fetch_icon(client: &Client, icon_url: &str, cache_path: &Path) -> Result<(), AssetError> {
    if let Some(parent) = cache_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let response = client.get(icon_url).send().await?;
    if !response.status().is_success() {
        return Err(AssetError::Network(format!("HTTP {}", response.status())));
    }

    let file_raw = tokio::fs::File::create(cache_path).await?;
    let mut file = BufWriter::new(file_raw);
    let mut stream = response.bytes_stream();

    while let Some(item) = stream.next().await {
        let chunk = item.map_err(|e| AssetError::Network(e.to_string()))?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(())
}

/// Decodes the cached icon for use as a window icon. `None` when the cache
/// is absent or unreadable; windows then fall back to the toolkit default.
pub fn load_window_icon(cache_path: &Path) -> Option<Image<'static>> {
    if !cache_path.exists() {
        return None;
    }
    match Image::from_path(cache_path) {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::debug!("cached icon unreadable: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon_url(server: &mockito::ServerGuard) -> String {
        format!("{}/favicon.ico", server.url())
    }

    #[tokio::test]
    async fn existing_cache_skips_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/favicon.ico")
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ICON_FILENAME);
        std::fs::write(&path, b"already cached").unwrap();

        let client = Client::new();
        let status = ensure_icon(&client, &icon_url(&server), &path).await;

        assert_eq!(status, IconStatus::Cached);
        assert_eq!(std::fs::read(&path).unwrap(), b"already cached");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn first_run_streams_icon_to_cache() {
        let mut server = mockito::Server::new_async().await;
        let body = vec![0u8, 1, 2, 3, 254, 255];
        let mock = server
            .mock("GET", "/favicon.ico")
            .with_status(200)
            .with_body(body.clone())
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(ICON_FILENAME);

        let client = Client::new();
        let status = ensure_icon(&client, &icon_url(&server), &path).await;

        assert_eq!(status, IconStatus::Fetched);
        assert_eq!(std::fs::read(&path).unwrap(), body);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn failed_fetch_leaves_cache_absent() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/favicon.ico")
            .with_status(500)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ICON_FILENAME);

        let client = Client::new();
        let status = ensure_icon(&client, &icon_url(&server), &path).await;

        assert_eq!(status, IconStatus::Unavailable);
        assert!(!path.exists());
    }

    #[test]
    fn missing_cache_yields_no_window_icon() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_window_icon(&dir.path().join(ICON_FILENAME)).is_none());
    }
}
