//! Merge engine: baseline schedule + incoming batch -> reconciled schedule.

use tracing::trace;
use tripbook_model::{DaySchedule, ItineraryItem};

/// Day key used for incoming items that carry no `date`.
pub const DEFAULT_DAY_KEY: &str = "1/1";

/// Counters describing what a single reconcile pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Incoming items that replaced an existing item with the same id.
    pub replaced: usize,
    /// Incoming items appended to their target day.
    pub appended: usize,
    /// Incoming items whose target day is not in the baseline.
    pub dropped: usize,
}

/// Merge `incoming` into a copy of `baseline`.
///
/// Each item is routed to the day whose `date` equals `item.date` (or
/// `default_day_key` when the item has none), then upserted by `id`: an
/// existing item with that id is fully replaced, otherwise the item is
/// appended. Items targeting an unknown day are dropped. Finally every day is
/// sorted by `time` using ordinal string comparison.
///
/// Items are never moved between days. Re-sending an id with a different
/// `date` inserts it into the new day and leaves the old copy where it was.
pub fn reconcile(
    baseline: &[DaySchedule],
    incoming: &[ItineraryItem],
    default_day_key: &str,
) -> Vec<DaySchedule> {
    reconcile_with_stats(baseline, incoming, default_day_key).0
}

/// Same as [`reconcile`], also returning per-pass counters.
pub fn reconcile_with_stats(
    baseline: &[DaySchedule],
    incoming: &[ItineraryItem],
    default_day_key: &str,
) -> (Vec<DaySchedule>, ReconcileStats) {
    let mut schedule = baseline.to_vec();
    let mut stats = ReconcileStats::default();

    for item in incoming {
        let day_key = item.date.as_deref().unwrap_or(default_day_key);

        let Some(day) = schedule.iter_mut().find(|day| day.date == day_key) else {
            trace!(item_id = %item.id, day = day_key, "No matching day, dropping item");
            stats.dropped += 1;
            continue;
        };

        match day.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item.clone();
                stats.replaced += 1;
            }
            None => {
                day.items.push(item.clone());
                stats.appended += 1;
            }
        }
    }

    for day in &mut schedule {
        sort_by_time(&mut day.items);
    }

    (schedule, stats)
}

/// Stable ascending sort on the raw `time` string.
pub fn sort_by_time(items: &mut [ItineraryItem]) {
    items.sort_by(|a, b| a.time.cmp(&b.time));
}
