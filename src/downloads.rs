//! Download interception for SunoShell
//!
//! The webview's default save behavior is suppressed; every announced
//! download runs through a short-lived flow instead: save dialog, streamed
//! transfer to the chosen path, one terminal log line. Each flow owns its
//! own [`PendingDownload`] record; concurrent downloads share nothing but
//! the HTTP client.

use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_dialog::DialogExt;
use thiserror::Error;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

/// Title of the native save dialog.
const SAVE_DIALOG_TITLE: &str = "Save your Suno file";

#[derive(Error, Debug, Clone)]
pub enum TransferError {
    /// Failure during the request or response streaming.
    #[error("network error: {0}")]
    Network(String),

    /// Failure while writing data to the chosen path.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for TransferError {
    fn from(err: reqwest::Error) -> Self {
        TransferError::Network(err.to_string())
    }
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        TransferError::Io(err.to_string())
    }
}

/// Lifecycle of a single announced download.
///
/// `Completed`, `Interrupted` and `Cancelled` are terminal; once reached, no
/// further event changes the state.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransferState {
    Announced,
    DialogPending,
    Saving,
    Completed,
    Interrupted,
    Cancelled,
}

impl TransferState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Announced => "announced",
            TransferState::DialogPending => "dialog-pending",
            TransferState::Saving => "saving",
            TransferState::Completed => "completed",
            TransferState::Interrupted => "interrupted",
            TransferState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferState::Completed | TransferState::Interrupted | TransferState::Cancelled
        )
    }

    /// Total transition function. Terminal states and out-of-order events
    /// leave the state unchanged, which is what guarantees at most one
    /// terminal outcome per download.
    pub fn advance(self, event: TransferEvent) -> TransferState {
        use TransferEvent::*;
        match (self, event) {
            (TransferState::Announced, DialogOpened) => TransferState::DialogPending,
            (TransferState::DialogPending, DialogCancelled) => TransferState::Cancelled,
            (TransferState::DialogPending, PathChosen) => TransferState::Saving,
            (TransferState::Saving, StreamFinished) => TransferState::Completed,
            (TransferState::Saving, StreamFailed) => TransferState::Interrupted,
            (state, _) => state,
        }
    }
}

/// Events observed during one download's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEvent {
    DialogOpened,
    DialogCancelled,
    PathChosen,
    StreamFinished,
    StreamFailed,
}

/// Ephemeral record for one announced download, owned by its flow task.
#[derive(Debug, Clone)]
pub struct PendingDownload {
    pub id: Uuid,
    pub url: Url,
    pub suggested_filename: String,
    pub save_path: Option<PathBuf>,
    pub state: TransferState,
}

impl PendingDownload {
    pub fn announced(url: Url, suggested_filename: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            suggested_filename,
            save_path: None,
            state: TransferState::Announced,
        }
    }

    pub fn apply(&mut self, event: TransferEvent) -> TransferState {
        self.state = self.state.advance(event);
        self.state
    }
}

/// Registry of in-flight downloads plus the shared HTTP client.
///
/// The analogue of a download manager: flows register themselves when a
/// download is announced and unregister once a terminal state is reached,
/// so concurrent transfers stay independent and observable.
pub struct DownloadBroker {
    client: Client,
    active: Arc<Mutex<HashMap<Uuid, TransferState>>>,
}

impl DownloadBroker {
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .unwrap_or_default();

        Self {
            client,
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Records the current state of an in-flight download.
    pub async fn track(&self, id: Uuid, state: TransferState) {
        let mut active = self.active.lock().await;
        active.insert(id, state);
    }

    /// Removes a download once it has reached a terminal state.
    pub async fn settle(&self, id: &Uuid) {
        let mut active = self.active.lock().await;
        active.remove(id);
    }

    pub async fn active_count(&self) -> usize {
        self.active.lock().await.len()
    }
}

impl Default for DownloadBroker {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point wired into the webview's download hook. Spawns the flow so
/// the event loop is never blocked on the dialog or the transfer.
pub fn spawn_flow<R: Runtime>(app: &AppHandle<R>, url: Url, suggested_filename: String) {
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        run_flow(app, url, suggested_filename).await;
    });
}

async fn run_flow<R: Runtime>(app: AppHandle<R>, url: Url, suggested_filename: String) {
    let broker = app.state::<DownloadBroker>();
    let mut pending = PendingDownload::announced(url, suggested_filename);
    broker.track(pending.id, pending.state).await;

    pending.apply(TransferEvent::DialogOpened);
    let choice = prompt_save_path(&app, &pending.suggested_filename).await;

    let Some(path) = choice else {
        // Declining the dialog ends this download silently: no file write,
        // no terminal log line.
        pending.apply(TransferEvent::DialogCancelled);
        broker.settle(&pending.id).await;
        return;
    };

    pending.save_path = Some(path.clone());
    pending.apply(TransferEvent::PathChosen);
    broker.track(pending.id, pending.state).await;

    match stream_to_file(broker.client(), pending.url.as_str(), &path).await {
        Ok(()) => {
            pending.apply(TransferEvent::StreamFinished);
            tracing::info!(id = %pending.id, "Download finished: {}", path.display());
        }
        Err(err) => {
            pending.apply(TransferEvent::StreamFailed);
            tracing::warn!(id = %pending.id, "Download interrupted ({err})");
            tracing::warn!(
                id = %pending.id,
                "Download failed: {}: {}",
                pending.state.as_str(),
                path.display()
            );
        }
    }
    broker.settle(&pending.id).await;
}

/// Presents the save dialog, pre-filled with the suggested filename and the
/// audio-first filter set. Resolves to `None` when the user cancels.
async fn prompt_save_path<R: Runtime>(app: &AppHandle<R>, suggested: &str) -> Option<PathBuf> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    let mut dialog = app
        .dialog()
        .file()
        .set_title(SAVE_DIALOG_TITLE)
        .set_file_name(suggested)
        .add_filter("Audio", &["mp3", "wav"])
        .add_filter("All Files", &["*"]);

    if let Some(window) = app.get_webview_window(crate::window::MAIN_WINDOW_LABEL) {
        dialog = dialog.set_parent(&window);
    }

    dialog.save_file(move |picked| {
        let _ = tx.send(picked.and_then(|file| file.into_path().ok()));
    });

    rx.await.unwrap_or(None)
}

/// Streams a GET response into `path`. One connection, no resume, no
/// throttling; any error mid-stream surfaces as an interruption.
pub async fn stream_to_file(client: &Client, url: &str, path: &Path) -> Result<(), TransferError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(TransferError::Network(format!("HTTP {}", response.status())));
    }

    let file_raw = tokio::fs::File::create(path).await?;
    let mut file = BufWriter::with_capacity(256 * 1024, file_raw);
    let mut stream = response.bytes_stream();

    while let Some(item) = stream.next().await {
        let chunk = item.map_err(|e| TransferError::Network(e.to_string()))?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(())
}

/// Fallback filename for a download whose suggested name is empty: the last
/// non-empty URL path segment, percent-decoded and sanitized.
pub fn suggested_filename(url: &Url) -> String {
    let name = url
        .path_segments()
        .and_then(|segments| segments.rev().find(|s| !s.is_empty()))
        .map(|s| {
            percent_encoding::percent_decode_str(s)
                .decode_utf8_lossy()
                .into_owned()
        })
        .unwrap_or_default();

    sanitize_filename(&name)
}

fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control() || "<>:\"/\\|?*".contains(c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    let sanitized = sanitized.trim().to_string();
    if sanitized.is_empty() {
        "download".to_string()
    } else {
        sanitized
    }
}
