use color_eyre::Result;
use tokio_util::sync::CancellationToken;

use super::InteractiveProcess;
use crate::{
    cli::BrowseFeedProcess,
    component::{Component, grid::FeedGridComponent},
    config::Config,
    service::FeedService,
};

impl InteractiveProcess for BrowseFeedProcess {
    fn into_component(
        self,
        config: Config,
        service: FeedService,
        cancellation_token: CancellationToken,
    ) -> Result<Box<dyn Component>> {
        let BrowseFeedProcess { query, mode } = self;
        let mode = mode.unwrap_or(config.search.mode);
        tracing::debug!("Browsing the feed with '{mode}' search mode");
        let component = FeedGridComponent::new(service, config, query.unwrap_or_default(), mode, cancellation_token);
        Ok(Box::new(component))
    }
}
