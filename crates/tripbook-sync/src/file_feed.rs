//! Feed backed by a JSON file of items.
//!
//! The file holds a JSON array of [`ItineraryItem`] documents. Subscribers
//! poll it on an interval and receive a snapshot only when its content
//! changed, so a human (or another tool) can edit the file and watch the
//! schedule update.
//!
//! Documents are read one at a time: a document that does not parse as an
//! item (an activity tag from a newer writer, a missing field) is skipped
//! with a warning and the rest of the batch is kept. Appends work on the raw
//! documents, so fields and documents tripbook does not understand are
//! written back untouched.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time;
use tracing::{debug, info, warn};
use tripbook_model::ItineraryItem;
use uuid::Uuid;

use crate::error::{Result, SyncError};
use crate::feed::{spawn_delivery, ItemsCallback, ItineraryFeed, Subscription};
use crate::reconcile::sort_by_time;

pub struct FileFeed {
    name: String,
    path: PathBuf,
    poll_interval: Duration,
    write_lock: Mutex<()>,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        let path = path.into();
        Self {
            name: format!("file:{}", path.display()),
            path,
            poll_interval,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the current items. A missing file is an empty feed.
    ///
    /// Fails only when the file is not a JSON array at all.
    pub async fn read_items(&self) -> Result<Vec<ItineraryItem>> {
        let content = read_or_empty(&self.path).await?;
        parse_items(&self.path, &content)
    }

    async fn read_documents(&self) -> Result<Vec<Value>> {
        let content = read_or_empty(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_documents(&self, documents: &[Value]) -> Result<()> {
        let json = serde_json::to_string_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

async fn read_or_empty(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok("[]".to_string()),
        Err(e) => Err(e.into()),
    }
}

/// Parse each document of a feed array on its own, skipping the bad ones.
fn parse_items(path: &Path, content: &str) -> Result<Vec<ItineraryItem>> {
    let documents: Vec<Value> = serde_json::from_str(content)?;
    let mut items = Vec::with_capacity(documents.len());

    for (index, document) in documents.into_iter().enumerate() {
        match serde_json::from_value::<ItineraryItem>(document) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(path = %path.display(), index, "Skipping unreadable feed item: {}", e);
            }
        }
    }

    sort_by_time(&mut items);
    Ok(items)
}

fn document_time(document: &Value) -> &str {
    document.get("time").and_then(Value::as_str).unwrap_or_default()
}

#[async_trait]
impl ItineraryFeed for FileFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !tokio::fs::try_exists(parent).await? {
                return Err(SyncError::ConnectFailed {
                    feed: self.name.clone(),
                    reason: format!("directory {} does not exist", parent.display()),
                });
            }
        }

        if !tokio::fs::try_exists(&self.path).await? {
            info!(path = %self.path.display(), "Creating empty feed file");
            self.write_documents(&[]).await?;
        }

        Ok(())
    }

    fn subscribe(&self, callback: ItemsCallback) -> Result<Subscription> {
        let path = self.path.clone();
        let poll_interval = self.poll_interval;

        spawn_delivery(&self.name, async move {
            let mut interval = time::interval(poll_interval);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            let mut last_seen: Option<String> = None;

            loop {
                interval.tick().await;

                let content = match read_or_empty(&path).await {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(path = %path.display(), "Failed to read feed file: {}", e);
                        continue;
                    }
                };

                if last_seen.as_deref() == Some(content.as_str()) {
                    continue;
                }

                match parse_items(&path, &content) {
                    Ok(items) => {
                        debug!(path = %path.display(), count = items.len(), "Feed file changed");
                        callback(items);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), "Ignoring unparseable feed file: {}", e);
                    }
                }

                last_seen = Some(content);
            }
        })
    }

    async fn add_item(&self, mut item: ItineraryItem) -> Result<String> {
        let _guard = self.write_lock.lock().await;

        let mut documents = self.read_documents().await?;
        let id = Uuid::new_v4().to_string();
        item.id = id.clone();
        documents.push(serde_json::to_value(&item)?);
        documents.sort_by(|a, b| document_time(a).cmp(document_time(b)));

        self.write_documents(&documents).await?;
        Ok(id)
    }
}
