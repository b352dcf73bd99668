use serde::{Deserialize, Serialize};

use crate::error::Result;

// --- Search request ---

/// One corner of a search bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

/// Bounding box the search is restricted to, as two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub north_west: GeoPoint,
    pub south_east: GeoPoint,
}

impl SearchArea {
    /// The Marseille metropolitan box.
    pub const MARSEILLE: SearchArea = SearchArea {
        north_west: GeoPoint {
            lon: 5.2286902,
            lat: 43.3910329,
        },
        south_east: GeoPoint {
            lon: 5.5324758,
            lat: 43.1696205,
        },
    };

    pub fn corners(&self) -> [GeoPoint; 2] {
        [self.north_west, self.south_east]
    }
}

/// Body of `POST /api/fr/search/{tool}`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    #[serde(rename = "idTool")]
    pub id_tool: u32,
    pub need_aggregation: bool,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub location: [GeoPoint; 2],
}

// --- Search response ---

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<SearchResults>,
}

impl SearchResponse {
    pub fn into_items(self) -> Vec<RawListing> {
        self.results.map(|r| r.items).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub items: Vec<RawListing>,
}

/// A search result item exactly as the API returned it.
///
/// Items stay untyped until [`RawListing::parse`] so a single malformed entry
/// does not fail the page it arrived on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawListing(pub serde_json::Value);

impl RawListing {
    pub fn parse(&self) -> Result<Listing> {
        Ok(Listing::deserialize(&self.0)?)
    }

    /// Best-effort identifier for log lines about items that failed to parse.
    pub fn id_hint(&self) -> String {
        match self.0.get("id") {
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => "<no id>".to_string(),
        }
    }
}

/// A single accommodation offer.
///
/// Only `id` and the residence fields are required. `label` and `bookingData`
/// are kept untyped and read leniently, so an odd value there never costs
/// the listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing {
    pub id: u64,
    #[serde(default)]
    pub label: Option<serde_json::Value>,
    pub residence: Residence,
    #[serde(rename = "bookingData", default)]
    pub booking_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Residence {
    pub label: String,
    pub address: String,
}

impl Listing {
    /// `"{label} - {residence}"`, with `N/A` standing in for a missing label.
    pub fn title(&self) -> String {
        let label = match &self.label {
            Some(serde_json::Value::String(s)) => s.clone(),
            None | Some(serde_json::Value::Null) => "N/A".to_string(),
            Some(other) => other.to_string(),
        };
        format!("{} - {}", label, self.residence.label)
    }

    /// Rent in euros, e.g. `"312.45€"`, or `"N/A"` unless `bookingData.amount`
    /// is an integer number of cents.
    pub fn price(&self) -> String {
        self.booking_data
            .as_ref()
            .and_then(|b| b.get("amount"))
            .and_then(|amount| amount.as_i64())
            .map(|cents| format!("{:.2}€", cents as f64 / 100.0))
            .unwrap_or_else(|| "N/A".to_string())
    }
}
