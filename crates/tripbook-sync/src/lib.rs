//! Itinerary synchronization for tripbook.
//!
//! This crate reconciles a static baseline schedule with the item set pushed
//! by a live document store.
//!
//! # Features
//!
//! - **Pure merge engine**: [`reconcile`] upserts incoming items by id into
//!   their target day and re-sorts every day by time. It never mutates the
//!   baseline and has no error path.
//! - **Pluggable feeds**: implement [`ItineraryFeed`] for a remote store. An
//!   in-process [`MemoryFeed`] and a polled JSON [`FileFeed`] are included.
//! - **Explicit client**: [`LiveClient::connect`] returns the connection result
//!   to the caller instead of keeping a global "configured" flag.
//! - **Live schedule**: [`ScheduleSync`] turns every delivered batch into a
//!   fresh schedule published on a `tokio::sync::watch` channel.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tripbook_sync::{LiveClient, MemoryFeed, ScheduleSync};
//!
//! let client = LiveClient::connect(Arc::new(MemoryFeed::new())).await?;
//! let sync = ScheduleSync::new(trip.days).with_default_day_key("1/1");
//! let mut live = sync.start(&client)?;
//!
//! while let Ok(schedule) = live.changed().await {
//!     render(&schedule);
//! }
//! ```

pub mod client;
pub mod error;
pub mod feed;
pub mod file_feed;
pub mod live;
pub mod reconcile;

pub use client::LiveClient;
pub use error::{Result, SyncError};
pub use feed::{ItemsCallback, ItineraryFeed, MemoryFeed, Subscription};
pub use file_feed::FileFeed;
pub use live::{LiveSchedule, ScheduleSync};
pub use reconcile::{reconcile, reconcile_with_stats, sort_by_time, ReconcileStats, DEFAULT_DAY_KEY};
