// Trait seams for the run's network edges.
//
// ListingSource hides the Crous search API; NotifyBackend (in notify::backend)
// hides the chat transport. Tests drive the run with the in-memory versions
// from `testing`.

use async_trait::async_trait;

use crous_client::{CrousClient, RawListing, SearchArea};

#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of results. An empty vec marks the end of the result set.
    async fn page(
        &self,
        page: u32,
        page_size: u32,
        area: &SearchArea,
    ) -> crous_client::Result<Vec<RawListing>>;
}

#[async_trait]
impl ListingSource for CrousClient {
    async fn page(
        &self,
        page: u32,
        page_size: u32,
        area: &SearchArea,
    ) -> crous_client::Result<Vec<RawListing>> {
        self.search_page(page, page_size, area).await
    }
}
