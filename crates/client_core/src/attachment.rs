//! Single-slot attachment holder with simulated upload progress.

use std::time::Duration;

use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};
use tracing::debug;

pub const PROGRESS_COMPLETE: u8 = 100;
const PROGRESS_STEP: u8 = 10;
/// Matches the cosmetic cadence of the upload bar: +10 every 100 ms.
pub const DEFAULT_PROGRESS_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Holds at most one selected attachment. Selecting a file starts a
/// simulated progress ticker; the progress value is cosmetic and never
/// gates submission. Replacing or clearing the attachment aborts the
/// previous ticker so no orphaned tick ever fires.
pub struct AttachmentTracker {
    tick_interval: Duration,
    inner: Mutex<Option<TrackedUpload>>,
}

struct TrackedUpload {
    attachment: Attachment,
    progress: watch::Receiver<u8>,
    ticker: JoinHandle<()>,
}

impl AttachmentTracker {
    pub fn new() -> Self {
        Self::with_tick_interval(DEFAULT_PROGRESS_TICK)
    }

    pub fn with_tick_interval(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            inner: Mutex::new(None),
        }
    }

    /// Replaces the current attachment wholesale, resets progress to 0 and
    /// starts a fresh ticker. Must be called from within a tokio runtime.
    pub async fn select_file(&self, attachment: Attachment) {
        let (progress_tx, progress_rx) = watch::channel(0u8);
        let tick_interval = self.tick_interval;
        let ticker = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // The first tick of a tokio interval completes immediately;
            // consume it so progress stays at 0 for a full tick.
            interval.tick().await;
            let mut progress = 0u8;
            while progress < PROGRESS_COMPLETE {
                interval.tick().await;
                progress = progress.saturating_add(PROGRESS_STEP).min(PROGRESS_COMPLETE);
                if progress_tx.send(progress).is_err() {
                    break;
                }
            }
        });

        debug!(filename = %attachment.filename, "attachment selected");
        let previous = self.inner.lock().await.replace(TrackedUpload {
            attachment,
            progress: progress_rx,
            ticker,
        });
        if let Some(previous) = previous {
            previous.ticker.abort();
        }
    }

    pub async fn clear(&self) {
        if let Some(previous) = self.inner.lock().await.take() {
            previous.ticker.abort();
        }
    }

    pub async fn current(&self) -> Option<Attachment> {
        self.inner
            .lock()
            .await
            .as_ref()
            .map(|tracked| tracked.attachment.clone())
    }

    /// Latest simulated progress for the current attachment, if any.
    pub async fn progress(&self) -> Option<u8> {
        self.inner
            .lock()
            .await
            .as_ref()
            .map(|tracked| *tracked.progress.borrow())
    }

    /// Watch subscription for the current attachment's progress. The
    /// sender side is dropped when the ticker finishes or is aborted.
    pub async fn subscribe_progress(&self) -> Option<watch::Receiver<u8>> {
        self.inner
            .lock()
            .await
            .as_ref()
            .map(|tracked| tracked.progress.clone())
    }
}

impl Default for AttachmentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AttachmentTracker {
    fn drop(&mut self) {
        if let Some(tracked) = self.inner.get_mut().take() {
            tracked.ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(filename: &str) -> Attachment {
        Attachment {
            filename: filename.to_string(),
            mime_type: None,
            bytes: b"doc".to_vec(),
        }
    }

    const TEST_TICK: Duration = Duration::from_millis(20);

    async fn drain_progress(rx: &mut watch::Receiver<u8>) -> Vec<u8> {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let value = *rx.borrow_and_update();
            seen.push(value);
            if value >= PROGRESS_COMPLETE {
                break;
            }
        }
        seen
    }

    #[tokio::test]
    async fn progress_advances_in_steps_of_ten_to_completion() {
        let tracker = AttachmentTracker::with_tick_interval(TEST_TICK);
        tracker.select_file(sample("pitch.pdf")).await;
        assert_eq!(tracker.progress().await, Some(0));

        let mut rx = tracker.subscribe_progress().await.expect("subscription");
        let seen = drain_progress(&mut rx).await;

        assert_eq!(*seen.last().expect("at least one tick"), PROGRESS_COMPLETE);
        assert!(seen.iter().all(|value| value % 10 == 0));
        assert!(seen.iter().all(|value| *value <= PROGRESS_COMPLETE));
        assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn selecting_a_new_file_resets_progress_and_stops_the_old_ticker() {
        let tracker = AttachmentTracker::with_tick_interval(TEST_TICK);
        tracker.select_file(sample("first.pdf")).await;
        let mut first_rx = tracker.subscribe_progress().await.expect("subscription");
        first_rx.changed().await.expect("first file ticked");

        tracker.select_file(sample("second.pdf")).await;
        assert_eq!(tracker.progress().await, Some(0));
        assert_eq!(
            tracker.current().await.map(|a| a.filename),
            Some("second.pdf".to_string())
        );

        // The aborted ticker drops its sender; once that lands the old
        // subscription yields no further values.
        while first_rx.changed().await.is_ok() {}
        let frozen = *first_rx.borrow();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(*first_rx.borrow(), frozen);

        let mut second_rx = tracker.subscribe_progress().await.expect("subscription");
        let seen = drain_progress(&mut second_rx).await;
        assert_eq!(*seen.last().expect("ticks"), PROGRESS_COMPLETE);
    }

    #[tokio::test]
    async fn clearing_or_dropping_the_tracker_aborts_the_ticker() {
        let tracker = AttachmentTracker::with_tick_interval(TEST_TICK);
        tracker.select_file(sample("doc.pdf")).await;
        let mut rx = tracker.subscribe_progress().await.expect("subscription");
        tracker.clear().await;
        assert_eq!(tracker.current().await, None);
        while rx.changed().await.is_ok() {}

        let tracker = AttachmentTracker::with_tick_interval(TEST_TICK);
        tracker.select_file(sample("doc.pdf")).await;
        let mut rx = tracker.subscribe_progress().await.expect("subscription");
        drop(tracker);
        while rx.changed().await.is_ok() {}
        assert!(*rx.borrow() <= PROGRESS_COMPLETE);
    }
}
