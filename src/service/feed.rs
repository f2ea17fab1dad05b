use reqwest::Url;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::FeedService;
use crate::{
    errors::{AppError, Result, UserFacingError},
    model::{AppEntry, FeedEnvelope},
};

impl FeedService {
    /// Fetches and decodes the feed, returning its entries in source order.
    ///
    /// The store is not updated, see [`refresh_feed`](FeedService::refresh_feed) for that.
    #[instrument(skip_all)]
    pub async fn fetch_feed(&self, cancellation_token: CancellationToken) -> Result<Vec<AppEntry>> {
        let Some(url) = self.feed_url.clone() else {
            return Err(UserFacingError::FeedInvalidUrl(self.raw_feed_url.clone()).into());
        };
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => {
                tracing::debug!("Feed fetch cancelled");
                Err(UserFacingError::Cancelled.into())
            }
            res = self.request_feed(url) => res,
        }
    }

    /// Fetches the feed and replaces the published entries with it.
    ///
    /// Failures leave the store untouched, they were already logged when the request failed. Returns whether the
    /// store was replaced.
    #[instrument(skip_all)]
    pub async fn refresh_feed(&self, cancellation_token: CancellationToken) -> bool {
        if self.feed_url.is_none() {
            tracing::debug!("Skipping feed refresh, the url is not valid: {}", self.raw_feed_url);
            return false;
        }
        match self.fetch_feed(cancellation_token).await {
            Ok(entries) => {
                self.store.replace(entries);
                true
            }
            Err(AppError::UserFacing(_)) => false,
            Err(AppError::Unexpected(report)) => {
                tracing::error!("Couldn't refresh the feed: {report:?}");
                false
            }
        }
    }

    /// Spawns a new task to [refresh](FeedService::refresh_feed) the feed
    pub fn spawn_refresh(&self, cancellation_token: CancellationToken) -> JoinHandle<bool> {
        let service = self.clone();
        tokio::spawn(async move { service.refresh_feed(cancellation_token).await })
    }

    async fn request_feed(&self, url: Url) -> Result<Vec<AppEntry>> {
        tracing::info!("Fetching feed: {url}");

        // Send the request
        let res = self.client.get(url).send().await.map_err(|err| {
            tracing::error!("{err:?}");
            UserFacingError::FeedRequestFailed(err.to_string())
        })?;

        // Check the response status
        let status = res.status();
        if !status.is_success() {
            let status_str = status.as_str();
            let body = res.text().await.unwrap_or_default();
            if let Some(reason) = status.canonical_reason() {
                tracing::error!("Got response [{status_str}] {reason}:\n{body}");
                return Err(
                    UserFacingError::FeedRequestFailed(format!("received {status_str} {reason} response")).into(),
                );
            } else {
                tracing::error!("Got response [{status_str}]:\n{body}");
                return Err(UserFacingError::FeedRequestFailed(format!("received {status_str} response")).into());
            }
        }

        // Read the body
        let body = res.bytes().await.map_err(|err| {
            tracing::error!("Couldn't read the feed response: {err:?}");
            UserFacingError::FeedRequestFailed(err.to_string())
        })?;
        if body.is_empty() {
            tracing::error!("The feed response had no content");
            return Err(UserFacingError::FeedMissingBody.into());
        }

        // Decode it
        let entries = FeedEnvelope::decode(&body).map_err(|err| {
            tracing::error!("Failed to decode: {err}");
            UserFacingError::FeedDecode(err.to_string())
        })?;

        tracing::info!("Fetched {} feed entries", entries.len());
        Ok(entries)
    }
}
