//! Schedule text search.

use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::trace;
use tripbook_model::{DaySchedule, ItineraryItem};

use crate::debounce::Debouncer;

/// Idle period before a search-as-you-type query runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

fn item_matches(item: &ItineraryItem, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(item.title.as_str())
        || item.location.as_deref().is_some_and(contains)
        || item.description.as_deref().is_some_and(contains)
}

/// First item, in day order then list order, whose title, location or
/// description contains `query` (trimmed, case-insensitive).
///
/// A blank query matches nothing.
pub fn find_first_match<'a>(schedule: &'a [DaySchedule], query: &str) -> Option<&'a ItineraryItem> {
    find_matches(schedule, query)
        .into_iter()
        .next()
        .map(|(_, item)| item)
}

/// Every matching item together with its day, in schedule order.
pub fn find_matches<'a>(
    schedule: &'a [DaySchedule],
    query: &str,
) -> Vec<(&'a DaySchedule, &'a ItineraryItem)> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    schedule
        .iter()
        .flat_map(|day| day.items.iter().map(move |item| (day, item)))
        .filter(|(_, item)| item_matches(item, &needle))
        .collect()
}

/// Search box backend: keystrokes go in, settled results come out.
///
/// Each [`DebouncedSearch::input`] restarts the wait; only the last query of
/// a burst is evaluated, against the schedule current at that moment.
pub struct DebouncedSearch {
    schedule: Arc<RwLock<Vec<DaySchedule>>>,
    debouncer: Debouncer<String>,
}

impl DebouncedSearch {
    pub fn new<F>(schedule: Vec<DaySchedule>, wait: Duration, on_result: F) -> Self
    where
        F: Fn(Option<ItineraryItem>) + Send + Sync + 'static,
    {
        let schedule = Arc::new(RwLock::new(schedule));
        let shared = Arc::clone(&schedule);

        let debouncer = Debouncer::new(wait, move |query: String| {
            let result = {
                let schedule = shared.read().unwrap_or_else(|e| e.into_inner());
                find_first_match(&schedule, &query).cloned()
            };
            trace!(query = %query, found = result.is_some(), "Search settled");
            on_result(result);
        });

        Self { schedule, debouncer }
    }

    /// Swap in a freshly reconciled schedule.
    pub fn set_schedule(&self, schedule: Vec<DaySchedule>) {
        *self.schedule.write().unwrap_or_else(|e| e.into_inner()) = schedule;
    }

    /// Feed one keystroke's worth of query text.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, like [`Debouncer::call`].
    pub fn input(&self, query: impl Into<String>) {
        self.debouncer.call(query.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::sleep;
    use tripbook_model::ActivityType;

    fn schedule() -> Vec<DaySchedule> {
        vec![
            DaySchedule::new("1/1", "Thu", "")
                .with_item(
                    ItineraryItem::new("d1-hotel", "Check-in", "Mu Yun", ActivityType::Hotel)
                        .with_location("Mu Yun Hotel, Taichung"),
                )
                .with_item(
                    ItineraryItem::new("d1-dinner", "19:30", "Yakiniku", ActivityType::Food)
                        .with_description("Table for two"),
                ),
            DaySchedule::new("1/2", "Fri", "").with_item(
                ItineraryItem::new("d2-hotel", "Check-in", "Harmony Hotel", ActivityType::Hotel),
            ),
        ]
    }

    #[test]
    fn matches_title_location_and_description() {
        let s = schedule();
        assert_eq!(find_first_match(&s, "yaki").unwrap().id, "d1-dinner");
        assert_eq!(find_first_match(&s, "TAICHUNG").unwrap().id, "d1-hotel");
        assert_eq!(find_first_match(&s, "for two").unwrap().id, "d1-dinner");
    }

    #[test]
    fn first_match_follows_schedule_order() {
        let s = schedule();
        assert_eq!(find_first_match(&s, "hotel").unwrap().id, "d1-hotel");

        let all: Vec<_> = find_matches(&s, "hotel")
            .into_iter()
            .map(|(day, item)| (day.date.as_str(), item.id.as_str()))
            .collect();
        assert_eq!(all, vec![("1/1", "d1-hotel"), ("1/2", "d2-hotel")]);
    }

    #[test]
    fn blank_or_missing_query_finds_nothing() {
        let s = schedule();
        assert!(find_first_match(&s, "   ").is_none());
        assert!(find_first_match(&s, "").is_none());
        assert!(find_first_match(&s, "ramen").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_search_reports_only_settled_query() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let search = DebouncedSearch::new(schedule(), SEARCH_DEBOUNCE, move |result| {
            let _ = tx.send(result.map(|item| item.id));
        });

        search.input("h");
        sleep(Duration::from_millis(50)).await;
        search.input("ha");
        sleep(Duration::from_millis(50)).await;
        search.input("harm");
        sleep(Duration::from_millis(500)).await;

        assert_eq!(rx.try_recv().unwrap().as_deref(), Some("d2-hotel"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_search_uses_latest_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let search = DebouncedSearch::new(Vec::new(), SEARCH_DEBOUNCE, move |result| {
            let _ = tx.send(result.map(|item| item.id));
        });

        search.input("yaki");
        search.set_schedule(schedule());
        sleep(Duration::from_millis(500)).await;

        assert_eq!(rx.try_recv().unwrap().as_deref(), Some("d1-dinner"));
    }
}
