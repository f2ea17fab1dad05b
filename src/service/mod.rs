use reqwest::{Client, Url};

use crate::{
    config::{Config, GridConfig},
    errors::{Result, UserFacingError},
    store::FeedStore,
};

mod artwork;
mod feed;

pub use artwork::{ArtworkLoader, ArtworkState, decode_thumbnail};
#[cfg(test)]
pub(crate) use feed::tests::{FEED, serve_bytes_once, serve_once, test_service};

/// Service fetching the feed of apps and publishing it to the [FeedStore]
#[derive(Clone)]
pub struct FeedService {
    client: Client,
    raw_feed_url: String,
    feed_url: Option<Url>,
    store: FeedStore,
    artwork: ArtworkLoader,
}

impl FeedService {
    /// Creates a new instance of `FeedService` for the given config.
    ///
    /// A malformed feed url is logged and every subsequent refresh will be a no-op.
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), &config.feed.url, config.grid)
    }

    /// Creates a new instance of `FeedService` using the given http client
    pub(crate) fn with_client(client: Client, feed_url: &str, grid: GridConfig) -> Self {
        let parsed_url = match parse_feed_url(feed_url) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::error!("{err}");
                None
            }
        };
        Self {
            artwork: ArtworkLoader::new(client.clone(), grid),
            client,
            raw_feed_url: feed_url.to_owned(),
            feed_url: parsed_url,
            store: FeedStore::new(),
        }
    }

    /// Retrieves the store where the fetched entries are published
    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    /// Retrieves the loader for the artwork of the entries
    pub fn artwork(&self) -> &ArtworkLoader {
        &self.artwork
    }
}

/// Parses the feed url, only http and https are supported
fn parse_feed_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|err| {
        tracing::debug!("Couldn't parse feed url '{raw}': {err}");
        UserFacingError::FeedInvalidUrl(raw.to_owned())
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(UserFacingError::FeedInvalidUrl(raw.to_owned()).into()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_feed_url() {
        assert_eq!(
            parse_feed_url("https://example.com/feed.json").unwrap().as_str(),
            "https://example.com/feed.json"
        );
        for raw in ["", "not a url", "ftp://example.com/feed.json", "/feed.json"] {
            assert_eq!(
                parse_feed_url(raw).unwrap_err().user_facing(),
                Some(&UserFacingError::FeedInvalidUrl(raw.to_owned()))
            );
        }
    }

    #[test]
    fn test_malformed_url_is_not_constructed() {
        let service = FeedService::with_client(Client::new(), "not a url", GridConfig::default());
        assert!(service.feed_url.is_none());
        assert!(service.store().snapshot().is_empty());
    }
}
