use tracing::warn;

use crous_client::{accommodation_url, Listing, RawListing};

use crate::types::Alert;

/// Alerts produced from one page, plus how many items could not be read.
#[derive(Debug, Default)]
pub struct PageMatches {
    pub alerts: Vec<Alert>,
    pub skipped: usize,
}

/// Plain, case-insensitive substring match of an ordered keyword list against
/// residence name and address.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
    tool_id: u32,
}

impl KeywordFilter {
    pub fn new<I, S>(keywords: I, tool_id: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords, tool_id }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First keyword, in configured order, found in the listing's residence
    /// name or address.
    ///
    /// The haystack is `"{name} {address}"` lowercased: the single space keeps
    /// a keyword from matching across the end of the name and the start of the
    /// address.
    pub fn matching_keyword(&self, listing: &Listing) -> Option<&str> {
        let haystack = format!(
            "{} {}",
            listing.residence.label, listing.residence.address
        )
        .to_lowercase();

        self.keywords
            .iter()
            .find(|k| haystack.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn alert_for(&self, listing: &Listing) -> Option<Alert> {
        let keyword = self.matching_keyword(listing)?;
        Some(Alert {
            keyword: keyword.to_string(),
            listing_id: listing.id,
            title: listing.title(),
            link: accommodation_url(self.tool_id, listing.id),
            address: listing.residence.address.clone(),
            price: listing.price(),
        })
    }

    /// Match every item of a page. Items that fail to parse are logged and
    /// counted, never fatal.
    pub fn filter_page(&self, items: &[RawListing]) -> PageMatches {
        let mut out = PageMatches::default();
        for item in items {
            match item.parse() {
                Ok(listing) => out.alerts.extend(self.alert_for(&listing)),
                Err(e) => {
                    warn!(id = %item.id_hint(), error = %e, "Skipping malformed listing");
                    out.skipped += 1;
                }
            }
        }
        out
    }
}
