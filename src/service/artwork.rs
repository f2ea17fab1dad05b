use std::{collections::HashMap, sync::Arc};

use color_eyre::eyre::Context;
use image::{RgbImage, imageops::FilterType};
use parking_lot::RwLock;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    config::GridConfig,
    errors::{Result, UserFacingError},
};

/// The state of the artwork for a given url
#[derive(Clone)]
pub enum ArtworkState {
    /// The artwork is being downloaded or decoded
    Loading,
    /// The artwork is ready to be displayed
    Ready(Arc<RgbImage>),
    /// The artwork couldn't be loaded, a placeholder must be displayed instead
    Failed,
}

/// Loads the artwork of the apps in the background, keeping them in memory for the whole session
#[derive(Clone)]
pub struct ArtworkLoader {
    client: Client,
    enabled: bool,
    size: u32,
    cache: Arc<RwLock<HashMap<String, ArtworkState>>>,
}

impl ArtworkLoader {
    /// Creates a new loader, artwork is downscaled to a square of `2 * artwork_rows` pixels
    pub fn new(client: Client, grid: GridConfig) -> Self {
        Self {
            client,
            enabled: grid.artwork,
            size: u32::from(grid.artwork_rows) * 2,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Whether artwork must be displayed at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Retrieves the current state of the artwork for the given url, if it was ever requested
    pub fn state(&self, url: &str) -> Option<ArtworkState> {
        self.cache.read().get(url).cloned()
    }

    /// Retrieves the state of the artwork for the given url, spawning a task to load it if it wasn't requested yet.
    ///
    /// If the token is cancelled before the load completes, the url is forgotten so it can be requested again.
    pub fn request(&self, url: &str, cancellation_token: &CancellationToken) -> ArtworkState {
        if !self.enabled {
            return ArtworkState::Failed;
        }
        if let Some(state) = self.state(url) {
            return state;
        }

        let mut cache = self.cache.write();
        // Another caller might have requested it in between
        if let Some(state) = cache.get(url) {
            return state.clone();
        }
        cache.insert(url.to_owned(), ArtworkState::Loading);
        drop(cache);

        let loader = self.clone();
        let url = url.to_owned();
        let cancellation_token = cancellation_token.clone();
        tokio::spawn(async move {
            let res = tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => None,
                res = loader.load(&url) => Some(res),
            };
            let mut cache = loader.cache.write();
            match res {
                None => {
                    tracing::trace!("Artwork load cancelled: {url}");
                    cache.remove(&url);
                }
                Some(Ok(image)) => {
                    cache.insert(url, ArtworkState::Ready(Arc::new(image)));
                }
                Some(Err(err)) => {
                    tracing::warn!("Couldn't load artwork {url}: {err}");
                    cache.insert(url, ArtworkState::Failed);
                }
            }
        });

        ArtworkState::Loading
    }

    #[instrument(skip(self))]
    async fn load(&self, url: &str) -> Result<RgbImage> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| UserFacingError::ArtworkRequestFailed(err.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(UserFacingError::ArtworkRequestFailed(format!("received {} response", status.as_str())).into());
        }
        let bytes = res
            .bytes()
            .await
            .map_err(|err| UserFacingError::ArtworkRequestFailed(err.to_string()))?;

        let size = self.size;
        tokio::task::spawn_blocking(move || decode_thumbnail(&bytes, size))
            .await
            .wrap_err("Artwork decoding worker join failed")?
    }
}

/// Decodes an image, downscaling it to a square thumbnail of the given size
pub fn decode_thumbnail(bytes: &[u8], size: u32) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes).map_err(|err| UserFacingError::ArtworkDecode(err.to_string()))?;
    Ok(image.resize_exact(size, size, FilterType::Triangle).to_rgb8())
}
