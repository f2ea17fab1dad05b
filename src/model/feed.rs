use std::fmt;

use serde::{Deserialize, Serialize};

use super::FilterMode;

/// The top-level document served by the feed endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEnvelope {
    pub feed: Feed,
}

/// The feed payload, holding the entries in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub results: Vec<AppEntry>,
}

/// A single application listed on the feed.
///
/// Every field is required, a missing or non-string field fails the decoding of the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppEntry {
    /// Copyright holder line
    pub copyright: String,
    /// Display name
    pub name: String,
    /// Url of the 100x100 artwork image
    #[serde(rename = "artworkUrl100")]
    pub artwork_url: String,
    /// Release date, as provided by the feed
    #[serde(rename = "releaseDate")]
    pub release_date: String,
}

impl FeedEnvelope {
    /// Decodes a feed document, returning its entries in source order
    pub fn decode(bytes: &[u8]) -> Result<Vec<AppEntry>, serde_json::Error> {
        let envelope: FeedEnvelope = serde_json::from_slice(bytes)?;
        Ok(envelope.feed.results)
    }

    /// Wraps the given entries into a document
    pub fn new(results: Vec<AppEntry>) -> Self {
        Self { feed: Feed { results } }
    }
}

impl AppEntry {
    /// Checks whether this entry must be displayed for the given query.
    ///
    /// Matching is a case-sensitive substring check and an empty query matches every entry.
    pub fn matches(&self, query: &str, mode: FilterMode) -> bool {
        if query.is_empty() {
            return true;
        }
        match mode {
            FilterMode::Fields => [&self.copyright, &self.name, &self.artwork_url, &self.release_date]
                .into_iter()
                .any(|field| field.contains(query)),
            FilterMode::Structural => format!("{self:?}").contains(query),
        }
    }
}

impl fmt::Display for AppEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.name, self.release_date, self.copyright)
    }
}

/// Filters the entries matching the query, preserving their order
pub fn filter_entries<'a>(entries: &'a [AppEntry], query: &str, mode: FilterMode) -> Vec<&'a AppEntry> {
    entries.iter().filter(|e| e.matches(query, mode)).collect()
}
