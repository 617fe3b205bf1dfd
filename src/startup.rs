//! Startup orchestration
//!
//! One strictly ordered path: show splash, fetch the icon (best-effort),
//! hold the splash for a fixed duration, close it, show the main window.
//! The hold is display pacing measured from fetch completion; it is not a
//! readiness signal and deliberately ignores how far the main window's
//! content has loaded.
//!
//! The sequence itself is a small state machine so the ordering and the
//! best-effort branch point are testable without a real clock or windows.

use std::time::Duration;
use tauri::{AppHandle, Manager, Runtime, WebviewWindow};

use crate::assets::{self, IconStatus};
use crate::downloads::DownloadBroker;
use crate::{splash, window};

/// How long the splash stays up after the icon fetch settles.
pub const SPLASH_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPhase {
    SplashShown,
    FetchPending,
    DelayPending,
    MainShown,
}

/// What the driver must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStep {
    FetchIcon,
    HoldSplash(Duration),
    PresentMainWindow,
}

/// Inputs that move the sequence forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupEvent {
    SplashVisible,
    /// The icon fetch settled. The status never branches the path; failure
    /// proceeds exactly like success, minus the icon.
    IconSettled(IconStatus),
    DelayElapsed,
}

#[derive(Debug)]
pub struct StartupSequence {
    phase: StartupPhase,
    splash_hold: Duration,
}

impl StartupSequence {
    pub fn new(splash_hold: Duration) -> Self {
        Self {
            phase: StartupPhase::SplashShown,
            splash_hold,
        }
    }

    pub fn phase(&self) -> StartupPhase {
        self.phase
    }

    /// Advances the sequence. Out-of-order events return `None` and leave
    /// the phase untouched; `MainShown` is terminal.
    pub fn handle(&mut self, event: StartupEvent) -> Option<StartupStep> {
        match (self.phase, event) {
            (StartupPhase::SplashShown, StartupEvent::SplashVisible) => {
                self.phase = StartupPhase::FetchPending;
                Some(StartupStep::FetchIcon)
            }
            (StartupPhase::FetchPending, StartupEvent::IconSettled(_)) => {
                self.phase = StartupPhase::DelayPending;
                Some(StartupStep::HoldSplash(self.splash_hold))
            }
            (StartupPhase::DelayPending, StartupEvent::DelayElapsed) => {
                self.phase = StartupPhase::MainShown;
                Some(StartupStep::PresentMainWindow)
            }
            _ => None,
        }
    }
}

/// Kicks off the startup flow once the runtime is ready. Spawned from the
/// application setup hook; failures are logged, never propagated into the
/// event loop.
pub fn spawn<R: Runtime>(app: &AppHandle<R>) {
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        if let Err(err) = run(&app).await {
            tracing::error!("startup aborted: {err}");
        }
    });
}

async fn run<R: Runtime>(app: &AppHandle<R>) -> tauri::Result<()> {
    let cache_path = assets::icon_cache_path(app)?;
    let mut sequence = StartupSequence::new(SPLASH_DURATION);

    // The orchestrator owns the only splash handle; nothing else may close
    // it, and taking it makes the close idempotent.
    let mut splash: Option<WebviewWindow<R>> =
        Some(splash::show_splash(app, assets::load_window_icon(&cache_path))?);

    let mut step = sequence.handle(StartupEvent::SplashVisible);
    while let Some(current) = step {
        step = match current {
            StartupStep::FetchIcon => {
                let broker = app.state::<DownloadBroker>();
                let status =
                    assets::ensure_icon(broker.client(), assets::ICON_URL, &cache_path).await;
                sequence.handle(StartupEvent::IconSettled(status))
            }
            StartupStep::HoldSplash(hold) => {
                tokio::time::sleep(hold).await;
                sequence.handle(StartupEvent::DelayElapsed)
            }
            StartupStep::PresentMainWindow => {
                if let Some(splash) = splash.take() {
                    let _ = splash.close();
                }
                window::show_main_window(app, assets::load_window_icon(&cache_path))?;
                None
            }
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_runs_in_order() {
        let mut sequence = StartupSequence::new(Duration::from_millis(5000));
        assert_eq!(sequence.phase(), StartupPhase::SplashShown);

        assert_eq!(
            sequence.handle(StartupEvent::SplashVisible),
            Some(StartupStep::FetchIcon)
        );
        assert_eq!(sequence.phase(), StartupPhase::FetchPending);

        assert_eq!(
            sequence.handle(StartupEvent::IconSettled(IconStatus::Fetched)),
            Some(StartupStep::HoldSplash(Duration::from_millis(5000)))
        );
        assert_eq!(sequence.phase(), StartupPhase::DelayPending);

        assert_eq!(
            sequence.handle(StartupEvent::DelayElapsed),
            Some(StartupStep::PresentMainWindow)
        );
        assert_eq!(sequence.phase(), StartupPhase::MainShown);
    }

    #[test]
    fn failed_fetch_still_reaches_the_main_window() {
        let mut sequence = StartupSequence::new(Duration::from_millis(10));
        sequence.handle(StartupEvent::SplashVisible);

        assert_eq!(
            sequence.handle(StartupEvent::IconSettled(IconStatus::Unavailable)),
            Some(StartupStep::HoldSplash(Duration::from_millis(10)))
        );
        assert_eq!(
            sequence.handle(StartupEvent::DelayElapsed),
            Some(StartupStep::PresentMainWindow)
        );
        assert_eq!(sequence.phase(), StartupPhase::MainShown);
    }

    #[test]
    fn out_of_order_events_are_ignored() {
        let mut sequence = StartupSequence::new(SPLASH_DURATION);

        assert_eq!(sequence.handle(StartupEvent::DelayElapsed), None);
        assert_eq!(
            sequence.handle(StartupEvent::IconSettled(IconStatus::Cached)),
            None
        );
        assert_eq!(sequence.phase(), StartupPhase::SplashShown);
    }

    #[test]
    fn main_shown_is_terminal() {
        let mut sequence = StartupSequence::new(SPLASH_DURATION);
        sequence.handle(StartupEvent::SplashVisible);
        sequence.handle(StartupEvent::IconSettled(IconStatus::Cached));
        sequence.handle(StartupEvent::DelayElapsed);

        assert_eq!(sequence.handle(StartupEvent::SplashVisible), None);
        assert_eq!(sequence.handle(StartupEvent::DelayElapsed), None);
        assert_eq!(sequence.phase(), StartupPhase::MainShown);
    }
}
