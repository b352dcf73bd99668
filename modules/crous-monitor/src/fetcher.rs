use std::time::Duration;

use tracing::{debug, info, warn};

use crous_client::{RawListing, SearchArea};

use crate::config::Config;
use crate::traits::ListingSource;

/// Counters for one paging pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    /// Non-empty pages received.
    pub pages: u32,
    pub listings: usize,
    /// Paging stopped at the page cap rather than at an empty page.
    pub truncated: bool,
}

/// Pages through the search API one request at a time.
pub struct ListingFetcher {
    source: Box<dyn ListingSource>,
    page_size: u32,
    max_pages: u32,
    area: SearchArea,
    page_delay: Duration,
}

impl ListingFetcher {
    pub fn new(source: Box<dyn ListingSource>, config: &Config) -> Self {
        Self {
            source,
            page_size: config.page_size,
            max_pages: config.max_pages,
            area: config.area,
            page_delay: config.page_delay,
        }
    }

    /// Request pages 1, 2, ... until one comes back empty, handing each
    /// non-empty page to `on_page` as it arrives.
    ///
    /// The first failed request aborts paging and is returned as-is; pages
    /// already handed out are the caller's to discard.
    pub async fn for_each_page<F>(&self, mut on_page: F) -> crous_client::Result<FetchSummary>
    where
        F: FnMut(u32, &[RawListing]),
    {
        let mut summary = FetchSummary::default();
        let mut page = 1;

        loop {
            if page > self.max_pages {
                warn!(
                    max_pages = self.max_pages,
                    listings = summary.listings,
                    "Page cap reached before an empty page, stopping"
                );
                summary.truncated = true;
                break;
            }

            if page > 1 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let items = match self.source.page(page, self.page_size, &self.area).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(page, error = %e, "Listing fetch failed, discarding this run");
                    return Err(e);
                }
            };

            if items.is_empty() {
                debug!(page, "Empty page, end of results");
                break;
            }

            summary.pages += 1;
            summary.listings += items.len();
            on_page(page, &items);
            page += 1;
        }

        info!(
            pages = summary.pages,
            listings = summary.listings,
            "Finished paging"
        );
        Ok(summary)
    }

    /// Collect every listing across all pages, in page order.
    pub async fn fetch_all(&self) -> crous_client::Result<Vec<RawListing>> {
        let mut all = Vec::new();
        self.for_each_page(|_, items| all.extend_from_slice(items))
            .await?;
        Ok(all)
    }
}
