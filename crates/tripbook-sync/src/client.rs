//! Explicitly constructed connection to a live-update feed.

use std::sync::Arc;
use tracing::{error, info};
use tripbook_model::ItineraryItem;

use crate::error::{Result, SyncError};
use crate::feed::{ItineraryFeed, Subscription};

/// A connected feed.
///
/// Obtaining one through [`LiveClient::connect`] is the only way to subscribe
/// or write, so a caller always knows whether live sync is available.
#[derive(Clone)]
pub struct LiveClient {
    feed: Arc<dyn ItineraryFeed>,
}

impl LiveClient {
    /// Connect to `feed`, returning the failure instead of storing it.
    pub async fn connect(feed: Arc<dyn ItineraryFeed>) -> Result<Self> {
        let name = feed.name().to_string();

        match feed.connect().await {
            Ok(()) => {
                info!(feed = %name, "Connected to itinerary feed");
                Ok(Self { feed })
            }
            Err(SyncError::ConnectFailed { feed, reason }) => {
                error!(feed = %feed, "Feed connection failed: {}", reason);
                Err(SyncError::ConnectFailed { feed, reason })
            }
            Err(e) => {
                error!(feed = %name, "Feed connection failed: {}", e);
                Err(SyncError::ConnectFailed {
                    feed: name,
                    reason: e.to_string(),
                })
            }
        }
    }

    pub fn feed_name(&self) -> &str {
        self.feed.name()
    }

    /// Subscribe to full item snapshots.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription>
    where
        F: Fn(Vec<ItineraryItem>) + Send + Sync + 'static,
    {
        info!(feed = %self.feed.name(), "Subscribing to updates");
        self.feed.subscribe(Box::new(callback))
    }

    /// Write a new item, returning the id assigned by the store.
    pub async fn add_item(&self, item: ItineraryItem) -> Result<String> {
        info!(feed = %self.feed.name(), title = %item.title, "Writing item");
        match self.feed.add_item(item).await {
            Ok(id) => {
                info!(feed = %self.feed.name(), id = %id, "Write succeeded");
                Ok(id)
            }
            Err(e) => {
                error!(feed = %self.feed.name(), "Write failed: {}", e);
                Err(e)
            }
        }
    }
}
