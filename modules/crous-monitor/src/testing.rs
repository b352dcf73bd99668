// Test doubles for the two network edges of a run:
// - MockSource (ListingSource): scripted pages served in request order
// - MockBackend (NotifyBackend): records delivered messages, can fail on demand
//
// Plus builders for listing JSON and alerts.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crous_client::{accommodation_url, CrousError, RawListing, SearchArea};

use crate::notify::NotifyBackend;
use crate::traits::ListingSource;
use crate::types::Alert;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A well-formed search item as the API returns it.
pub fn listing_json(id: u64, residence: &str, address: &str) -> Value {
    json!({
        "id": id,
        "label": format!("Studio {id}"),
        "residence": { "label": residence, "address": address },
        "bookingData": { "amount": 30000 + id }
    })
}

pub fn sample_alert(id: u64, keyword: &str) -> Alert {
    Alert {
        keyword: keyword.to_string(),
        listing_id: id,
        title: format!("Studio {id} - Résidence Luminy"),
        link: accommodation_url(41, id),
        address: "163 avenue de Luminy, 13009 Marseille".to_string(),
        price: "300.00€".to_string(),
    }
}

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// Serves scripted responses in request order. Once the script runs out every
/// page is empty.
pub struct MockSource {
    script: Mutex<VecDeque<Result<Vec<RawListing>, CrousError>>>,
    requests: Arc<Mutex<Vec<u32>>>,
    page_sizes: Arc<Mutex<Vec<u32>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
            page_sizes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_page(self, items: Vec<RawListing>) -> Self {
        self.push(Ok(items))
    }

    pub fn with_json_page(self, items: Vec<Value>) -> Self {
        self.with_page(items.into_iter().map(RawListing).collect())
    }

    pub fn with_error(self, err: CrousError) -> Self {
        self.push(Err(err))
    }

    fn push(self, response: Result<Vec<RawListing>, CrousError>) -> Self {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(response);
        self
    }

    /// Page numbers requested so far.
    pub fn requests(&self) -> Arc<Mutex<Vec<u32>>> {
        self.requests.clone()
    }

    pub fn page_sizes(&self) -> Arc<Mutex<Vec<u32>>> {
        self.page_sizes.clone()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingSource for MockSource {
    async fn page(
        &self,
        page: u32,
        page_size: u32,
        _area: &SearchArea,
    ) -> crous_client::Result<Vec<RawListing>> {
        self.requests.lock().expect("requests lock poisoned").push(page);
        self.page_sizes
            .lock()
            .expect("page_sizes lock poisoned")
            .push(page_size);
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// MockBackend
// ---------------------------------------------------------------------------

/// Records each delivered message. With `fail_from(n)`, the n-th send
/// (0-based) and every later one fails.
pub struct MockBackend {
    max_len: usize,
    fail_from: Option<usize>,
    attempts: Mutex<usize>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            fail_from: None,
            attempts: Mutex::new(0),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fail_from(mut self, n: usize) -> Self {
        self.fail_from = Some(n);
        self
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Arc<Mutex<Vec<String>>> {
        self.sent.clone()
    }
}

#[async_trait]
impl NotifyBackend for MockBackend {
    fn max_message_len(&self) -> usize {
        self.max_len
    }

    async fn send(&self, text: &str) -> anyhow::Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().expect("attempts lock poisoned");
            let n = *attempts;
            *attempts += 1;
            n
        };
        if self.fail_from.is_some_and(|n| attempt >= n) {
            anyhow::bail!("MockBackend: send {attempt} rejected");
        }
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .push(text.to_string());
        Ok(())
    }
}
