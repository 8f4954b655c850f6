// file: src/collector/paginator.rs
// description: paginated, rate limited listing collection with bounded retries
// reference: offset pagination over the browse api search endpoint

use crate::api::SearchApi;
use crate::collector::filter::passes_date_filter;
use crate::config::CollectorConfig;
use crate::error::FetchError;
use crate::models::{Row, SearchPage};
use crate::pipeline::ProgressTracker;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub terms_processed: usize,
    pub terms_truncated: usize,
    pub pages_fetched: usize,
    pub items_filtered: usize,
    pub retries: usize,
    pub rows_collected: usize,
}

/// Outcome of collecting a single search term.
#[derive(Debug, Clone, Default)]
pub struct TermReport {
    pub rows: Vec<Row>,
    pub pages_fetched: usize,
    pub items_filtered: usize,
    /// Set when a page failed for good and the term stopped early.
    pub truncated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub rows: Vec<Row>,
    pub stats: CollectStats,
}

pub struct Collector<'a, A: SearchApi> {
    api: &'a A,
    config: &'a CollectorConfig,
    cutoff: DateTime<Utc>,
    /// Progress bar style; `None` keeps the bar hidden.
    color: Option<bool>,
    retries: AtomicUsize,
}

impl<'a, A: SearchApi> Collector<'a, A> {
    pub fn new(api: &'a A, config: &'a CollectorConfig) -> Self {
        Self {
            api,
            config,
            cutoff: config.cutoff(),
            color: None,
            retries: AtomicUsize::new(0),
        }
    }

    /// Draws a progress bar per term, colored or plain.
    pub fn with_progress(mut self, color: bool) -> Self {
        self.color = Some(color);
        self
    }

    /// Collects every configured term in order. Each term may take whatever is
    /// left of `target_rows`; once nothing is left the remaining terms are
    /// skipped.
    pub async fn collect_all(&self, terms: &[String]) -> Collection {
        let mut collection = Collection::default();

        for term in terms {
            let remaining = self
                .config
                .target_rows
                .saturating_sub(collection.rows.len());
            if remaining == 0 {
                info!("Target of {} rows reached, skipping remaining terms", self.config.target_rows);
                break;
            }

            info!("Fetching items for: {}", term);
            let report = self.collect_term(term, remaining).await;

            collection.stats.terms_processed += 1;
            collection.stats.pages_fetched += report.pages_fetched;
            collection.stats.items_filtered += report.items_filtered;
            if report.truncated {
                collection.stats.terms_truncated += 1;
            }
            info!("Collected {} rows for '{}'", report.rows.len(), term);
            collection.rows.extend(report.rows);
        }

        collection.stats.rows_collected = collection.rows.len();
        collection.stats.retries = self.retries.load(Ordering::SeqCst);
        collection
    }

    /// Pages through `query` until `quota` rows are gathered or a page comes
    /// back empty. A page that cannot be fetched ends the term with what has
    /// been collected so far.
    pub async fn collect_term(&self, query: &str, quota: usize) -> TermReport {
        let progress = match self.color {
            Some(color) => {
                ProgressTracker::with_color(quota, &format!("Fetching {}", query), color)
            }
            None => ProgressTracker::hidden(quota),
        };

        let mut report = TermReport::default();
        let mut offset = 0;

        while report.rows.len() < quota {
            let finished = match self.fetch_page(query, offset).await {
                Ok(page) if page.is_empty() => {
                    report.pages_fetched += 1;
                    debug!(query, offset, "Empty page, no more items");
                    true
                }
                Ok(page) => {
                    report.pages_fetched += 1;
                    self.take_page(query, page, quota, &mut report, &progress);
                    offset += self.config.page_size;
                    false
                }
                Err(e) => {
                    warn!("Failed fetching {} at offset {}: {}", query, offset, e);
                    report.truncated = true;
                    true
                }
            };

            // Paced after every page, including the one that ends the term.
            sleep(self.config.page_delay()).await;
            if finished {
                break;
            }
        }

        progress.finish();
        report
    }

    fn take_page(
        &self,
        query: &str,
        page: SearchPage,
        quota: usize,
        report: &mut TermReport,
        progress: &ProgressTracker,
    ) {
        for item in page.item_summaries {
            if !passes_date_filter(item.item_creation_date.as_deref(), self.cutoff) {
                report.items_filtered += 1;
                progress.inc_skipped(false);
                continue;
            }

            report.rows.push(Row::from_item(query, item));
            progress.inc_completed();
            if report.rows.len() >= quota {
                break;
            }
        }
    }

    /// One page request with retries. Transient failures are retried with
    /// exponential backoff until `max_attempts` requests have been made.
    pub async fn fetch_page(&self, query: &str, offset: usize) -> Result<SearchPage, FetchError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match self.api.search(query, self.config.page_size, offset).await {
                Ok(page) => return Ok(page),
                Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                    let wait = self.backoff_delay(attempt);
                    warn!(
                        query,
                        offset,
                        attempt = attempt + 1,
                        "Rate limit/error ({}), retrying in {:.1}s",
                        err,
                        wait.as_secs_f64()
                    );
                    self.retries.fetch_add(1, Ordering::SeqCst);
                    sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Delay before the retry that follows failed attempt `attempt` (zero based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.config
            .initial_backoff()
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemSummary;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Debug, Clone)]
    struct Call {
        query: String,
        limit: usize,
        offset: usize,
        at: Instant,
    }

    /// Serves `available` items per query, dated 2024 except every `old_every`th.
    /// Scripted failures are returned first, one per call.
    struct FakeSearch {
        available: usize,
        old_every: Option<usize>,
        failures: Mutex<VecDeque<(usize, FetchError)>>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeSearch {
        fn new(available: usize) -> Self {
            Self {
                available,
                old_every: None,
                failures: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_old_every(mut self, n: usize) -> Self {
            self.old_every = Some(n);
            self
        }

        /// Fail the next request made at `offset` with `err`.
        fn fail_at(self, offset: usize, err: FetchError) -> Self {
            self.failures.lock().unwrap().push_back((offset, err));
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn offsets(&self) -> Vec<usize> {
            self.calls().iter().map(|c| c.offset).collect()
        }
    }

    impl SearchApi for FakeSearch {
        async fn search(
            &self,
            query: &str,
            limit: usize,
            offset: usize,
        ) -> Result<SearchPage, FetchError> {
            self.calls.lock().unwrap().push(Call {
                query: query.to_string(),
                limit,
                offset,
                at: Instant::now(),
            });

            {
                let mut failures = self.failures.lock().unwrap();
                if failures.front().is_some_and(|(at, _)| *at == offset) {
                    let (_, err) = failures.pop_front().unwrap();
                    return Err(err);
                }
            }

            let end = (offset + limit).min(self.available);
            let item_summaries = (offset.min(end)..end)
                .map(|i| {
                    let old = self.old_every.is_some_and(|n| i % n == 0);
                    ItemSummary {
                        item_id: Some(format!("{}-{}", query, i)),
                        item_creation_date: Some(if old {
                            "2021-06-01T00:00:00.000Z".to_string()
                        } else {
                            "2024-06-01T00:00:00.000Z".to_string()
                        }),
                        ..ItemSummary::default()
                    }
                })
                .collect();

            Ok(SearchPage {
                item_summaries,
                total: Some(self.available as u64),
            })
        }
    }

    fn config(target_rows: usize, page_size: usize) -> CollectorConfig {
        CollectorConfig {
            target_rows,
            page_size,
            ..CollectorConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_spans_three_pages() {
        let api = FakeSearch::new(1_000);
        let config = config(250, 100);
        let collector = Collector::new(&api, &config);

        let report = collector.collect_term("shoes", 250).await;

        assert_eq!(report.rows.len(), 250);
        assert_eq!(api.offsets(), vec![0, 100, 200]);
        assert!(api.calls().iter().all(|c| c.limit == 100 && c.query == "shoes"));
        assert!(!report.truncated);
        assert_eq!(report.rows.last().unwrap().item_id, "shoes-249");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_empty_page() {
        let api = FakeSearch::new(150);
        let config = config(1_000, 100);
        let collector = Collector::new(&api, &config);

        let report = collector.collect_term("laptop", 1_000).await;

        assert_eq!(report.rows.len(), 150);
        assert_eq!(api.offsets(), vec![0, 100, 200]);
        assert_eq!(report.pages_fetched, 3);
        assert!(!report.truncated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_exceeds_target() {
        for (target, page_size) in [(1, 100), (7, 3), (99, 100), (100, 100), (101, 100), (250, 40)] {
            let api = FakeSearch::new(10_000).with_old_every(4);
            let config = config(target, page_size);
            let collector = Collector::new(&api, &config);

            let collection = collector.collect_all(&["a".to_string(), "b".to_string()]).await;
            assert!(
                collection.rows.len() <= target,
                "target {} page {} got {}",
                target,
                page_size,
                collection.rows.len()
            );
            assert_eq!(collection.rows.len(), target);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_items_never_collected() {
        let api = FakeSearch::new(300).with_old_every(3);
        let config = config(10_000, 100);
        let collector = Collector::new(&api, &config);

        let report = collector.collect_term("camera", 10_000).await;

        assert_eq!(report.items_filtered, 100);
        assert_eq!(report.rows.len(), 200);
        assert!(
            report
                .rows
                .iter()
                .all(|r| r.item_creation_date.starts_with("2024"))
        );
        // Filtered items do not end pagination; only the empty page does.
        assert_eq!(api.offsets(), vec![0, 100, 200, 300]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_status_with_growing_backoff() {
        let api = FakeSearch::new(50)
            .fail_at(0, FetchError::Status(503))
            .fail_at(0, FetchError::Status(503));
        let config = config(50, 100);
        let collector = Collector::new(&api, &config);

        let report = collector.collect_term("shoes", 50).await;

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.offset == 0));

        let first_wait = calls[1].at - calls[0].at;
        let second_wait = calls[2].at - calls[1].at;
        assert!(first_wait >= Duration::from_secs(2) && first_wait < Duration::from_secs(3));
        assert!(second_wait >= Duration::from_secs(4) && second_wait < Duration::from_secs(5));

        assert!(!report.truncated);
        assert_eq!(report.rows.len(), 50);
        assert_eq!(collector.retries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_failure_truncates_term() {
        let api = FakeSearch::new(1_000).fail_at(100, FetchError::Status(400));
        let config = config(500, 100);
        let collector = Collector::new(&api, &config);

        let report = collector.collect_term("shoes", 500).await;

        assert!(report.truncated);
        assert_eq!(report.rows.len(), 100);
        assert_eq!(api.offsets(), vec![0, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_exhaust_attempts() {
        let mut api = FakeSearch::new(1_000);
        for _ in 0..5 {
            api = api.fail_at(0, FetchError::Status(429));
        }
        let config = config(100, 100);
        let collector = Collector::new(&api, &config);

        let report = collector.collect_term("shoes", 100).await;

        assert!(report.truncated);
        assert!(report.rows.is_empty());
        assert_eq!(api.calls().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pages_are_paced() {
        let api = FakeSearch::new(300);
        let config = config(300, 100);
        let collector = Collector::new(&api, &config);

        collector.collect_term("shoes", 300).await;

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            let gap = pair[1].at - pair[0].at;
            assert!(gap >= Duration::from_millis(500) && gap < Duration::from_millis(600));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_terms_share_run_target() {
        let api = FakeSearch::new(100);
        let config = config(150, 100);
        let collector = Collector::new(&api, &config);

        let terms = vec!["laptop".to_string(), "shoes".to_string(), "camera".to_string()];
        let collection = collector.collect_all(&terms).await;

        assert_eq!(collection.rows.len(), 150);
        let laptops = collection.rows.iter().filter(|r| r.query == "laptop").count();
        let shoes = collection.rows.iter().filter(|r| r.query == "shoes").count();
        assert_eq!((laptops, shoes), (100, 50));
        assert!(api.calls().iter().all(|c| c.query != "camera"));
        assert_eq!(collection.stats.terms_processed, 2);
        assert_eq!(collection.stats.rows_collected, 150);
    }

    #[tokio::test(start_paused = true)]
    async fn test_truncated_term_does_not_stop_run() {
        let api = FakeSearch::new(100).fail_at(0, FetchError::Status(403));
        let config = config(1_000, 100);
        let collector = Collector::new(&api, &config);

        let terms = vec!["laptop".to_string(), "shoes".to_string()];
        let collection = collector.collect_all(&terms).await;

        assert_eq!(collection.stats.terms_truncated, 1);
        assert_eq!(collection.rows.len(), 100);
        assert!(collection.rows.iter().all(|r| r.query == "shoes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_term_waits_after_rate_limited_term() {
        let mut api = FakeSearch::new(100);
        for _ in 0..5 {
            api = api.fail_at(0, FetchError::Status(429));
        }
        let config = config(1_000, 100);
        let collector = Collector::new(&api, &config);

        let terms = vec!["laptop".to_string(), "shoes".to_string()];
        let collection = collector.collect_all(&terms).await;

        let calls = api.calls();
        let last_laptop = calls.iter().rev().find(|c| c.query == "laptop").unwrap();
        let first_shoes = calls.iter().find(|c| c.query == "shoes").unwrap();
        let gap = first_shoes.at - last_laptop.at;
        assert!(gap >= Duration::from_millis(500) && gap < Duration::from_millis(600));
        assert_eq!(collection.stats.terms_truncated, 1);
        assert_eq!(collection.rows.len(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_term_waits_after_empty_page() {
        let api = FakeSearch::new(0);
        let config = config(1_000, 100);
        let collector = Collector::new(&api, &config);

        collector
            .collect_all(&["laptop".to_string(), "shoes".to_string()])
            .await;

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].at - calls[0].at >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_plain_progress_collects_same_rows() {
        let api = FakeSearch::new(120);
        let config = config(120, 100);
        let collector = Collector::new(&api, &config).with_progress(false);

        let report = collector.collect_term("shoes", 120).await;

        assert_eq!(report.rows.len(), 120);
        assert_eq!(collector.color, Some(false));
    }

    #[test]
    fn test_backoff_doubles() {
        let api = FakeSearch::new(0);
        let config = CollectorConfig::default();
        let collector = Collector::new(&api, &config);

        let delays: Vec<u64> = (0..4).map(|a| collector.backoff_delay(a).as_secs()).collect();
        assert_eq!(delays, vec![2, 4, 8, 16]);
    }
}
