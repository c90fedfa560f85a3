//! Live-update feed abstraction.
//!
//! A feed is the remote store the itinerary edits come from. On every change
//! it pushes the *entire* current item set (not a diff) to each subscriber.

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use tripbook_model::ItineraryItem;
use uuid::Uuid;

use crate::error::{Result, SyncError};
use crate::reconcile::sort_by_time;

/// Callback receiving a full snapshot of the feed's items, ordered by time.
pub type ItemsCallback = Box<dyn Fn(Vec<ItineraryItem>) + Send + Sync + 'static>;

/// Trait implemented by every live-update source.
#[async_trait]
pub trait ItineraryFeed: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Prepare the feed for use.
    ///
    /// Called once by [`crate::LiveClient::connect`]. The default does nothing.
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// Start delivering snapshots to `callback`.
    ///
    /// The current snapshot is delivered right away, then again after every
    /// change. Delivery stops when the returned [`Subscription`] is
    /// unsubscribed or dropped.
    fn subscribe(&self, callback: ItemsCallback) -> Result<Subscription>;

    /// Store a new item and return the id the store assigned to it.
    ///
    /// Any id already present on `item` is discarded.
    async fn add_item(&self, item: ItineraryItem) -> Result<String>;
}

/// Handle for an active subscription. Dropping it stops delivery.
#[derive(Debug)]
pub struct Subscription {
    feed: String,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(feed: impl Into<String>, task: JoinHandle<()>) -> Self {
        Self {
            feed: feed.into(),
            task: Some(task),
        }
    }

    pub fn feed(&self) -> &str {
        &self.feed
    }

    /// Whether the delivery task is still running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop delivery. No callback runs after this returns, except one that
    /// was already executing on another thread.
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(feed = %self.feed, "Unsubscribed from feed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawn a delivery task on the current runtime.
pub(crate) fn spawn_delivery<F>(feed: &str, future: F) -> Result<Subscription>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let handle = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
    Ok(Subscription::new(feed, handle.spawn(future)))
}

/// In-process feed backed by a `watch` channel.
///
/// Useful for tests and for embedding tripbook next to another process that
/// pushes edits directly.
pub struct MemoryFeed {
    name: String,
    items: watch::Sender<Vec<ItineraryItem>>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(mut items: Vec<ItineraryItem>) -> Self {
        sort_by_time(&mut items);
        let (items, _) = watch::channel(items);
        Self {
            name: "memory".to_string(),
            items,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Current items, ordered by time.
    pub fn snapshot(&self) -> Vec<ItineraryItem> {
        self.items.borrow().clone()
    }

    /// Replace the whole item set.
    pub fn replace_all(&self, mut items: Vec<ItineraryItem>) {
        sort_by_time(&mut items);
        self.items.send_replace(items);
    }

    /// Insert or replace one item by id.
    pub fn upsert(&self, item: ItineraryItem) {
        self.items.send_modify(|items| {
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => *existing = item,
                None => items.push(item),
            }
            sort_by_time(items);
        });
    }

    /// Remove an item by id. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut removed = false;
        self.items.send_if_modified(|items| {
            let before = items.len();
            items.retain(|item| item.id != id);
            removed = items.len() != before;
            removed
        });
        removed
    }
}

impl Default for MemoryFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItineraryFeed for MemoryFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn subscribe(&self, callback: ItemsCallback) -> Result<Subscription> {
        let mut rx = self.items.subscribe();
        let name = self.name.clone();

        spawn_delivery(&self.name, async move {
            let items = rx.borrow_and_update().clone();
            callback(items);

            while rx.changed().await.is_ok() {
                let items = rx.borrow_and_update().clone();
                debug!(feed = %name, count = items.len(), "Delivering snapshot");
                callback(items);
            }
        })
    }

    async fn add_item(&self, mut item: ItineraryItem) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        item.id = id.clone();
        self.upsert(item);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tripbook_model::ActivityType;

    fn item(id: &str, time: &str) -> ItineraryItem {
        ItineraryItem::new(id, time, id, ActivityType::Note)
    }

    fn channel_callback() -> (ItemsCallback, mpsc::UnboundedReceiver<Vec<ItineraryItem>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let callback: ItemsCallback = Box::new(move |items| {
            let _ = tx.send(items);
        });
        (callback, rx)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<Vec<ItineraryItem>>) -> Vec<ItineraryItem> {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("snapshot in time")
            .expect("channel open")
    }

    #[test]
    fn snapshot_is_ordered_by_time() {
        let feed = MemoryFeed::with_items(vec![item("b", "12:00"), item("a", "08:00")]);
        let ids: Vec<_> = feed.snapshot().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn upsert_and_remove() {
        let feed = MemoryFeed::new();
        feed.upsert(item("a", "08:00"));
        feed.upsert(ItineraryItem::new("a", "09:00", "moved", ActivityType::Food));
        assert_eq!(feed.snapshot().len(), 1);
        assert_eq!(feed.snapshot()[0].title, "moved");

        assert!(feed.remove("a"));
        assert!(!feed.remove("a"));
        assert!(feed.snapshot().is_empty());
    }

    #[test]
    fn subscribe_outside_runtime_fails() {
        let feed = MemoryFeed::new();
        let (callback, _rx) = channel_callback();
        assert!(matches!(feed.subscribe(callback), Err(SyncError::NoRuntime)));
    }

    #[tokio::test]
    async fn subscriber_receives_initial_and_updated_snapshots() {
        let feed = MemoryFeed::with_items(vec![item("a", "08:00")]);
        let (callback, mut rx) = channel_callback();

        let subscription = feed.subscribe(callback).unwrap();
        assert!(subscription.is_active());
        assert_eq!(next(&mut rx).await.len(), 1);

        feed.upsert(item("b", "07:00"));
        let snapshot = next(&mut rx).await;
        let ids: Vec<_> = snapshot.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let feed = MemoryFeed::new();
        let (callback, mut rx) = channel_callback();

        let subscription = feed.subscribe(callback).unwrap();
        assert!(next(&mut rx).await.is_empty());

        subscription.unsubscribe();
        feed.upsert(item("a", "08:00"));

        // The callback owned the sender, so an aborted task closes the channel.
        let after = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("channel closes");
        assert!(after.is_none());
    }

    #[tokio::test]
    async fn add_item_assigns_fresh_id() {
        let feed = MemoryFeed::new();
        let submitted = ItineraryItem::new("client-side", "15:00", "Souvenirs", ActivityType::Activity)
            .with_date("1/4");

        let id = feed.add_item(submitted).await.unwrap();

        assert_ne!(id, "client-side");
        assert!(Uuid::parse_str(&id).is_ok());
        let stored = feed.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].date.as_deref(), Some("1/4"));
    }
}
