use color_eyre::{Result, eyre::Context};
use itertools::Itertools;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::{Process, ProcessOutput};
use crate::{
    cli::ListFeedProcess,
    config::Config,
    errors::AppError,
    format_error,
    model::filter_entries,
    service::FeedService,
};

impl Process for ListFeedProcess {
    #[instrument(skip_all)]
    async fn execute(
        self,
        config: Config,
        service: FeedService,
        cancellation_token: CancellationToken,
    ) -> Result<ProcessOutput> {
        let ListFeedProcess { query, mode, json } = self;
        let mode = mode.unwrap_or(config.search.mode);
        let query = query.unwrap_or_default();

        let entries = match service.fetch_feed(cancellation_token).await {
            Ok(entries) => entries,
            Err(AppError::UserFacing(err)) => {
                return Ok(ProcessOutput::fail().stderr(format_error!(config.theme, "{err}")));
            }
            Err(AppError::Unexpected(report)) => return Err(report),
        };

        let filtered = filter_entries(&entries, &query, mode);
        tracing::info!("Listing {} out of {} entries", filtered.len(), entries.len());
        if json {
            let json = serde_json::to_string_pretty(&filtered).wrap_err("Couldn't serialize the entries")?;
            Ok(ProcessOutput::success().stdout(json))
        } else if filtered.is_empty() {
            Ok(ProcessOutput::success())
        } else {
            Ok(ProcessOutput::success().stdout(filtered.into_iter().join("\n")))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::FilterMode,
        service::{FEED, serve_once, test_service},
    };

    #[tokio::test]
    async fn test_list_filtered_entries() {
        let url = serve_once("200 OK", FEED).await;
        let process = ListFeedProcess {
            query: Some(String::from("2021-01-02")),
            mode: None,
            json: false,
        };
        let output = process
            .execute(Config::default(), test_service(&url), CancellationToken::new())
            .await
            .unwrap();
        assert!(!output.is_failure());
        assert_eq!(output.stdout_text(), Some("App2\t2021-01-02\t© B"));
    }

    #[tokio::test]
    async fn test_list_as_json() {
        let url = serve_once("200 OK", FEED).await;
        let process = ListFeedProcess {
            query: Some(String::from("artworkUrl100")),
            mode: Some(FilterMode::Fields),
            json: true,
        };
        let output = process
            .execute(Config::default(), test_service(&url), CancellationToken::new())
            .await
            .unwrap();
        // Field names are not part of the searchable text on fields mode
        assert_eq!(output.stdout_text(), Some("[]"));

        let url = serve_once("200 OK", FEED).await;
        let process = ListFeedProcess {
            query: Some(String::from("App1")),
            mode: None,
            json: true,
        };
        let output = process
            .execute(Config::default(), test_service(&url), CancellationToken::new())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(output.stdout_text().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "copyright": "© A",
                "name": "App1",
                "artworkUrl100": "http://x/1.png",
                "releaseDate": "2021-01-01"
            }])
        );
    }

    #[tokio::test]
    async fn test_list_reports_fetch_errors() {
        let url = serve_once("200 OK", r#"{"feed":{"results":[{"name":"App1"}]}}"#).await;
        let output = ListFeedProcess::default()
            .execute(Config::default(), test_service(&url), CancellationToken::new())
            .await
            .unwrap();
        assert!(output.is_failure());
        assert_eq!(output.stdout_text(), None);
        let stderr = strip_ansi_escapes::strip_str(output.stderr_text().unwrap());
        assert!(stderr.starts_with("[Error] Failed to decode the feed: missing field"));
    }
}
