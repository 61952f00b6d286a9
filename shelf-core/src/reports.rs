//! Report affordances.
//!
//! [`ReportedIds`] is the read-only list of records someone already flagged;
//! [`ReportLimiter`] caps how many reports a visitor sends per day. Sending
//! a report and persisting the limiter are the host's concern.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rustc_hash::FxHashSet;
use shelf_types::{Book, CatalogConfig};

/// Identifiers of already-reported records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportedIds {
    ids: FxHashSet<String>,
}

impl ReportedIds {
    /// Builds the set from the reported-IDs list.
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Number of distinct reported IDs.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` if `id` was reported.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if `book` may be reported: it has an ID and nobody
    /// reported it yet.
    pub fn can_report(&self, book: &Book) -> bool {
        !book.id.is_empty() && !self.contains(&book.id)
    }
}

/// Per-day report counter.
///
/// Serializes as `{"2024-05-01": 1, ...}`, keyed by UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLimiter {
    limit: u32,
    sent: BTreeMap<String, u32>,
}

impl Default for ReportLimiter {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

impl ReportLimiter {
    /// Creates an empty limiter allowing `limit` reports per day.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            sent: BTreeMap::new(),
        }
    }

    /// Creates an empty limiter with the configured daily limit.
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.daily_report_limit)
    }

    /// Daily limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Restores a limiter from its JSON form. Corrupt state starts over.
    pub fn from_json(json: &str, limit: u32) -> Self {
        Self {
            limit,
            sent: serde_json::from_str(json).unwrap_or_default(),
        }
    }

    /// JSON form, for the host to persist.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.sent).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Reports sent on `day`.
    pub fn sent_on(&self, day: NaiveDate) -> u32 {
        self.sent.get(&day_key(day)).copied().unwrap_or(0)
    }

    /// Returns `true` if another report may be sent on `day`.
    pub fn can_send(&self, day: NaiveDate) -> bool {
        self.sent_on(day) < self.limit
    }

    /// Records a report sent on `day`.
    pub fn record(&mut self, day: NaiveDate) {
        *self.sent.entry(day_key(day)).or_insert(0) += 1;
    }

    /// [`can_send`](Self::can_send) for the current UTC day.
    pub fn can_send_today(&self) -> bool {
        self.can_send(Utc::now().date_naive())
    }

    /// [`record`](Self::record) for the current UTC day.
    pub fn record_today(&mut self) {
        self.record(Utc::now().date_naive());
    }
}

fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).expect("valid date")
    }

    #[test]
    fn reported_books_cannot_be_reported_again() {
        let reported = ReportedIds::new(vec!["b1".to_owned(), "b1".to_owned(), "b7".to_owned()]);
        assert_eq!(reported.len(), 2);

        let mut book = Book {
            id: "b1".into(),
            ..Default::default()
        };
        assert!(!reported.can_report(&book));

        book.id = "b2".into();
        assert!(reported.can_report(&book));

        book.id.clear();
        assert!(!reported.can_report(&book));
    }

    #[test]
    fn one_report_per_day_by_default() {
        let mut limiter = ReportLimiter::default();
        assert!(limiter.can_send(day(1)));

        limiter.record(day(1));
        assert!(!limiter.can_send(day(1)));
        assert!(limiter.can_send(day(2)));
    }

    #[test]
    fn limit_comes_from_config() {
        let config = CatalogConfig {
            daily_report_limit: 3,
            ..CatalogConfig::default()
        };
        let mut limiter = ReportLimiter::from_config(&config);
        assert_eq!(limiter.limit(), 3);
        for _ in 0..3 {
            assert!(limiter.can_send(day(4)));
            limiter.record(day(4));
        }
        assert!(!limiter.can_send(day(4)));
        assert_eq!(ReportLimiter::default().limit(), 1);
    }

    #[test]
    fn custom_limit() {
        let mut limiter = ReportLimiter::new(2);
        limiter.record(day(1));
        assert!(limiter.can_send(day(1)));
        limiter.record(day(1));
        assert!(!limiter.can_send(day(1)));
        assert_eq!(limiter.sent_on(day(1)), 2);
    }

    #[test]
    fn json_round_trip() {
        let mut limiter = ReportLimiter::new(1);
        limiter.record(day(3));
        let json = limiter.to_json();
        assert_eq!(json, r#"{"2024-05-03":1}"#);

        let restored = ReportLimiter::from_json(&json, 1);
        assert!(!restored.can_send(day(3)));
    }

    #[test]
    fn corrupt_state_starts_over() {
        let limiter = ReportLimiter::from_json("not json", 1);
        assert!(limiter.can_send(day(3)));
    }

    #[test]
    fn today_helpers() {
        let mut limiter = ReportLimiter::new(1);
        assert!(limiter.can_send_today());
        limiter.record_today();
        assert_eq!(limiter.sent_on(Utc::now().date_naive()), 1);
    }
}
