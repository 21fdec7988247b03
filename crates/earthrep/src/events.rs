//! Single-consumer event loop.
//!
//! Host callbacks (map clicks, form submits, list clicks, resets) arrive as
//! [`AppEvent`]s on a channel. [`run`] owns the [`App`] while it runs and
//! handles one event at a time, so handlers never overlap and need no
//! locking. The one timer, the delayed form-display restore, posts its
//! event back into the same channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::app::{App, Submission};
use crate::error::Result;
use crate::form::{FormInput, SubmitError};
use crate::geolocation::GeolocationProvider;
use crate::map::MapView;
use crate::notify::Notifier;
use crate::record::{Coordinates, Record, RecordId};
use crate::render::ClickTarget;
use crate::storage::KeyValueStorage;

/// Capacity of the event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Something the host reports to the app.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The map was clicked.
    MapClick(Coordinates),
    /// The form was submitted with these raw values.
    Submit(FormInput),
    /// The record list was clicked.
    ListClick(ClickTarget),
    /// The form hide delay has passed.
    RestoreFormDisplay,
    /// Discard all reports and start over.
    Reset,
    /// Stop the loop.
    Shutdown,
}

/// What happened while the loop ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Records created, in order.
    pub accepted: Vec<Record>,
    /// Rejected submissions, in order.
    pub rejected: Vec<SubmitError>,
    /// Records the map was focused on, in order.
    pub focused: Vec<RecordId>,
    /// Number of resets performed.
    pub resets: usize,
    /// Whether the map was loaded when the loop stopped.
    pub map_ready: bool,
}

/// Create the event channel.
#[must_use]
pub fn channel() -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}

/// Locate the user, then handle events until [`AppEvent::Shutdown`] or
/// until every sender is dropped.
///
/// `timers` is used to post timer events back into the loop. It is weak,
/// so the loop also ends when the host drops its senders.
///
/// # Errors
///
/// Returns the first storage or map failure; the loop stops there.
pub async fn run<S, M, N, G>(
    app: &mut App<S, M, N>,
    provider: &G,
    timers: &mpsc::WeakSender<AppEvent>,
    mut rx: mpsc::Receiver<AppEvent>,
) -> Result<RunSummary>
where
    S: KeyValueStorage,
    M: MapView,
    N: Notifier,
    G: GeolocationProvider + ?Sized,
{
    let mut summary = RunSummary::default();

    app.locate_user(provider).await?;

    while let Some(event) = rx.recv().await {
        trace!(?event, "Handling event");
        match event {
            AppEvent::MapClick(coords) => app.map_click(coords),
            AppEvent::Submit(input) => match app.submit_input(input)? {
                Submission::Accepted(record) => {
                    schedule_restore(timers, app.config().restore_delay());
                    summary.accepted.push(record);
                }
                Submission::Rejected(reason) => summary.rejected.push(reason),
            },
            AppEvent::ListClick(target) => {
                if let Some(id) = app.locate_from_list_click(&target)? {
                    summary.focused.push(id);
                }
            }
            AppEvent::RestoreFormDisplay => app.restore_form_display(),
            AppEvent::Reset => {
                app.reset()?;
                summary.resets += 1;
                app.locate_user(provider).await?;
            }
            AppEvent::Shutdown => {
                debug!("Event loop shutting down");
                break;
            }
        }
    }

    summary.map_ready = app.is_map_ready();
    Ok(summary)
}

fn schedule_restore(timers: &mpsc::WeakSender<AppEvent>, delay: Duration) {
    let timers = timers.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(tx) = timers.upgrade() {
            let _ = tx.send(AppEvent::RestoreFormDisplay).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geolocation::FixedPosition;
    use crate::map::RecordingMap;
    use crate::notify::RecordingNotifier;
    use crate::storage::MemoryStorage;

    type TestApp = App<MemoryStorage, RecordingMap, RecordingNotifier>;

    fn test_app(restore_delay_ms: u64) -> TestApp {
        let mut config = Config::default();
        config.form.restore_delay_ms = restore_delay_ms;
        App::boot(
            config,
            MemoryStorage::new(),
            RecordingMap::new(),
            RecordingNotifier::new(),
        )
        .unwrap()
    }

    fn home() -> FixedPosition {
        FixedPosition::new(Coordinates::new(45.8, 15.9))
    }

    #[tokio::test]
    async fn test_report_then_locate() {
        let mut app = test_app(1000);
        let (tx, rx) = channel();

        tx.send(AppEvent::MapClick(Coordinates::new(45.0, 15.0)))
            .await
            .unwrap();
        tx.send(AppEvent::Submit(FormInput::new("4.5", "30", "10", "minor cracks")))
            .await
            .unwrap();
        tx.send(AppEvent::Shutdown).await.unwrap();

        let summary = run(&mut app, &home(), &tx.downgrade(), rx).await.unwrap();
        assert_eq!(summary.accepted.len(), 1);
        assert!(summary.rejected.is_empty());
        assert!(summary.map_ready);
        assert_eq!(app.store().len(), 1);

        // Click the rendered entry in a second session of the loop.
        let (tx, rx) = channel();
        tx.send(AppEvent::ListClick(app.list()[0].click_target()))
            .await
            .unwrap();
        tx.send(AppEvent::Shutdown).await.unwrap();

        let summary = run(&mut app, &home(), &tx.downgrade(), rx).await.unwrap();
        assert_eq!(summary.focused, vec![app.store().records()[0].id().clone()]);
    }

    #[tokio::test]
    async fn test_rejection_is_reported() {
        let mut app = test_app(1000);
        let (tx, rx) = channel();

        tx.send(AppEvent::MapClick(Coordinates::new(45.0, 15.0)))
            .await
            .unwrap();
        tx.send(AppEvent::Submit(FormInput::new("-1", "30", "10", "")))
            .await
            .unwrap();
        tx.send(AppEvent::Shutdown).await.unwrap();

        let summary = run(&mut app, &home(), &tx.downgrade(), rx).await.unwrap();
        assert!(summary.accepted.is_empty());
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(app.storage().write_count(), 0);
    }

    #[tokio::test]
    async fn test_loop_ends_when_senders_drop() {
        let mut app = test_app(1000);
        let (tx, rx) = channel();
        let timers = tx.downgrade();

        tx.send(AppEvent::MapClick(Coordinates::new(1.0, 1.0)))
            .await
            .unwrap();
        drop(tx);

        let summary = run(&mut app, &home(), &timers, rx).await.unwrap();
        assert!(summary.accepted.is_empty());
        assert!(summary.map_ready);
        assert!(app.form().is_open());
    }

    async fn submit_then_stop_after(app: &mut TestApp, stop_after: Duration) -> RunSummary {
        let (tx, rx) = channel();
        tx.send(AppEvent::MapClick(Coordinates::new(45.0, 15.0)))
            .await
            .unwrap();
        tx.send(AppEvent::Submit(FormInput::new("1", "1", "1", "")))
            .await
            .unwrap();

        let host = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(stop_after).await;
            let _ = host.send(AppEvent::Shutdown).await;
        });

        run(app, &home(), &tx.downgrade(), rx).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_form_display_suppressed_until_delay() {
        let mut app = test_app(1000);

        let summary = submit_then_stop_after(&mut app, Duration::from_millis(500)).await;
        assert_eq!(summary.accepted.len(), 1);
        assert!(app.form().is_display_suppressed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_form_display_restored_after_delay() {
        let mut app = test_app(1000);

        let summary = submit_then_stop_after(&mut app, Duration::from_millis(1500)).await;
        assert_eq!(summary.accepted.len(), 1);
        assert!(!app.form().is_display_suppressed());
    }

    #[tokio::test]
    async fn test_reset_event_reloads_map() {
        let mut app = test_app(1000);
        let (tx, rx) = channel();

        tx.send(AppEvent::MapClick(Coordinates::new(45.0, 15.0)))
            .await
            .unwrap();
        tx.send(AppEvent::Submit(FormInput::new("1", "1", "1", "")))
            .await
            .unwrap();
        tx.send(AppEvent::Reset).await.unwrap();
        tx.send(AppEvent::Shutdown).await.unwrap();

        let summary = run(&mut app, &home(), &tx.downgrade(), rx).await.unwrap();
        assert_eq!(summary.resets, 1);
        assert!(summary.map_ready);
        assert!(app.store().is_empty());
        assert!(app.storage().get_item("earthquakes").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_position() {
        let mut app = test_app(1000);
        let (tx, rx) = channel();

        tx.send(AppEvent::MapClick(Coordinates::new(45.0, 15.0)))
            .await
            .unwrap();
        tx.send(AppEvent::Submit(FormInput::new("1", "1", "1", "")))
            .await
            .unwrap();
        tx.send(AppEvent::Shutdown).await.unwrap();

        let summary = run(&mut app, &FixedPosition::unavailable(), &tx.downgrade(), rx)
            .await
            .unwrap();
        assert!(!summary.map_ready);
        assert_eq!(summary.rejected, vec![SubmitError::NoPendingLocation]);
    }
}
