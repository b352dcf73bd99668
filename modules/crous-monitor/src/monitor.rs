use tracing::info;

use crate::config::Config;
use crate::fetcher::ListingFetcher;
use crate::filter::KeywordFilter;
use crate::notify::Notifier;
use crate::traits::ListingSource;
use crate::types::{NotifyOutcome, RunReport};

/// One fetch → filter → notify pass.
pub struct Monitor {
    fetcher: ListingFetcher,
    filter: KeywordFilter,
    notifier: Notifier,
}

impl Monitor {
    pub fn new(source: Box<dyn ListingSource>, notifier: Notifier, config: &Config) -> Self {
        Self {
            fetcher: ListingFetcher::new(source, config),
            filter: KeywordFilter::new(&config.keywords, config.tool_id),
            notifier,
        }
    }

    /// Run once. Never fails: a fetch error empties the run, a notify error
    /// is recorded, and both end up in the report.
    pub async fn run(&self) -> RunReport {
        info!(keywords = ?self.filter.keywords(), "Starting check");

        let mut alerts = Vec::new();
        let mut skipped = 0;
        let fetched = self
            .fetcher
            .for_each_page(|page, items| {
                let matches = self.filter.filter_page(items);
                if !matches.alerts.is_empty() {
                    info!(page, matched = matches.alerts.len(), "Matches on page");
                }
                skipped += matches.skipped;
                alerts.extend(matches.alerts);
            })
            .await;

        // The fetcher already logged the failure; matches so far are dropped.
        let summary = match fetched {
            Ok(summary) => summary,
            Err(e) => {
                return RunReport {
                    pages: 0,
                    listings: 0,
                    skipped: 0,
                    alerts: Vec::new(),
                    fetch_error: Some(e.to_string()),
                    notify: NotifyOutcome::Skipped,
                };
            }
        };

        info!(
            listings = summary.listings,
            alerts = alerts.len(),
            skipped,
            "Filtering complete"
        );

        let notify = self.notifier.notify(&alerts).await;

        RunReport {
            pages: summary.pages,
            listings: summary.listings,
            skipped,
            alerts,
            fetch_error: None,
            notify,
        }
    }
}
