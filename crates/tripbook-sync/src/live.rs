//! Live schedule: baseline + feed snapshots -> latest reconciled schedule.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;
use tripbook_model::{DaySchedule, ItineraryItem};

use crate::client::LiveClient;
use crate::error::{Result, SyncError};
use crate::feed::Subscription;
use crate::reconcile::{reconcile_with_stats, DEFAULT_DAY_KEY};

/// Reconciles every delivered batch against an immutable baseline.
#[derive(Debug, Clone)]
pub struct ScheduleSync {
    baseline: Arc<Vec<DaySchedule>>,
    default_day_key: String,
}

impl ScheduleSync {
    pub fn new(baseline: Vec<DaySchedule>) -> Self {
        Self {
            baseline: Arc::new(baseline),
            default_day_key: DEFAULT_DAY_KEY.to_string(),
        }
    }

    /// Day that receives incoming items without a `date`.
    pub fn with_default_day_key(mut self, key: impl Into<String>) -> Self {
        self.default_day_key = key.into();
        self
    }

    pub fn baseline(&self) -> &[DaySchedule] {
        &self.baseline
    }

    pub fn default_day_key(&self) -> &str {
        &self.default_day_key
    }

    /// Reconcile one full batch against the baseline.
    pub fn apply(&self, incoming: &[ItineraryItem]) -> Vec<DaySchedule> {
        let (schedule, stats) = reconcile_with_stats(&self.baseline, incoming, &self.default_day_key);
        debug!(
            incoming = incoming.len(),
            replaced = stats.replaced,
            appended = stats.appended,
            dropped = stats.dropped,
            "Reconciled schedule"
        );
        schedule
    }

    /// Subscribe through `client` and publish each reconciled schedule.
    ///
    /// The returned [`LiveSchedule`] starts out holding the sorted baseline.
    pub fn start(&self, client: &LiveClient) -> Result<LiveSchedule> {
        let (tx, rx) = watch::channel(self.apply(&[]));
        let sync = self.clone();

        let subscription = client.subscribe(move |items| {
            tx.send_replace(sync.apply(&items));
        })?;

        Ok(LiveSchedule {
            feed: client.feed_name().to_string(),
            schedule: rx,
            subscription,
        })
    }
}

/// A running live schedule. Dropping it unsubscribes.
pub struct LiveSchedule {
    feed: String,
    schedule: watch::Receiver<Vec<DaySchedule>>,
    subscription: Subscription,
}

impl LiveSchedule {
    /// Most recent reconciled schedule.
    pub fn current(&self) -> Vec<DaySchedule> {
        self.schedule.borrow().clone()
    }

    /// Wait for the next reconciled schedule.
    pub async fn changed(&mut self) -> Result<Vec<DaySchedule>> {
        self.schedule
            .changed()
            .await
            .map_err(|_| SyncError::FeedClosed(self.feed.clone()))?;
        Ok(self.schedule.borrow_and_update().clone())
    }

    /// A receiver for callers that want to drive their own select loop.
    pub fn receiver(&self) -> watch::Receiver<Vec<DaySchedule>> {
        self.schedule.clone()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn stop(self) {
        self.subscription.unsubscribe();
    }
}
