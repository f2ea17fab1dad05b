use std::{
    fmt, io,
    panic::{self, UnwindSafe},
    path::PathBuf,
    process,
};

use color_eyre::{Report, Section, config::HookBuilder, owo_colors::style};
use futures_util::FutureExt;
use thiserror::Error;
use tokio::sync::mpsc;

/// Convenience alias for results carrying an [`AppError`]
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Initializes error and panics handling, then drives the given future to completion.
///
/// Panic reports are deferred until the future is dropped, so they're not lost while the terminal is in raw mode.
pub async fn init<F>(log_path: PathBuf, fut: F) -> color_eyre::Result<()>
where
    F: Future<Output = color_eyre::Result<()>> + UnwindSafe,
{
    tracing::trace!("Initializing error handlers");
    let panic_section = format!(
        "This is a bug. Consider reporting it along with the logs found at {}, running with APP_GRID_LOG=debug \
         records more details",
        log_path.display()
    );
    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section(panic_section.clone())
        .display_env_section(false)
        .display_location_section(true)
        .capture_span_trace_by_default(true)
        .into_hooks();

    let (panic_tx, mut panic_rx) = mpsc::channel(1);

    eyre_hook.install()?;
    panic::set_hook(Box::new(move |panic_info| {
        // The terminal might still be in raw mode here, the report is printed once the main future is gone
        let panic_report = panic_hook.panic_report(panic_info).to_string();
        tracing::error!("Error: {}", strip_ansi_escapes::strip_str(&panic_report));
        if panic_tx.try_send(panic_report).is_err() {
            tracing::error!("Error sending panic report");
            process::exit(2);
        }
    }));

    tokio::select! {
        biased;
        panic_report = panic_rx.recv().fuse() => {
            match panic_report {
                Some(report) => eprintln!("{report}"),
                None => {
                    eprintln!(
                        "{}\n\n{panic_section}",
                        style().bright_red().style("A panic occurred, but the detailed report could not be captured.")
                    );
                    tracing::error!("A panic occurred, but the detailed report could not be captured.");
                }
            }
            process::exit(1);
        }
        res = Box::pin(fut).catch_unwind() => {
            match res {
                Ok(r) => r
                    .with_section(move || panic_section)
                    .inspect_err(|err| tracing::error!("Error: {}", strip_ansi_escapes::strip_str(format!("{err:?}")))),
                Err(err) => {
                    if let Ok(report) = panic_rx.try_recv() {
                        eprintln!("{report}");
                    } else if let Some(err) = err.downcast_ref::<&str>() {
                        print_panic_msg(err, panic_section);
                    } else if let Some(err) = err.downcast_ref::<String>() {
                        print_panic_msg(err, panic_section);
                    } else {
                        eprintln!(
                            "{}\n\n{panic_section}",
                            style().bright_red().style("An unexpected panic happened")
                        );
                        tracing::error!("An unexpected panic happened");
                    }
                    process::exit(1);
                }
            }
        }
    }
}

fn print_panic_msg(err: impl AsRef<str>, panic_section: String) {
    let err = err.as_ref();
    eprintln!(
        "{}\nMessage: {}\n\n{panic_section}",
        style().bright_red().style("The application panicked (crashed)."),
        style().blue().style(err)
    );
    tracing::error!("Panic: {err}");
}

/// Top-level error for the application operations
pub enum AppError {
    /// An expected failure with a message meant for the user (or the logs)
    UserFacing(UserFacingError),
    /// Anything else, carrying the full report
    Unexpected(Report),
}

/// Expected failures of the feed and artwork operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserFacingError {
    /// The configured feed url can't be parsed
    #[error("Invalid feed url '{0}'")]
    FeedInvalidUrl(String),
    /// The feed request failed at the transport level or got a non-success status
    #[error("Feed request failed: {0}")]
    FeedRequestFailed(String),
    /// The feed response had no body
    #[error("The feed response had no content")]
    FeedMissingBody,
    /// The feed body doesn't have the expected shape
    #[error("Failed to decode the feed: {0}")]
    FeedDecode(String),
    /// The artwork request failed
    #[error("Artwork request failed: {0}")]
    ArtworkRequestFailed(String),
    /// The artwork bytes are not a supported image
    #[error("Failed to decode the artwork: {0}")]
    ArtworkDecode(String),
    /// The operation was cancelled before completing
    #[error("Operation cancelled")]
    Cancelled,
}

impl AppError {
    /// Converts this error into a [Report]
    pub fn into_report(self) -> Report {
        match self {
            AppError::UserFacing(err) => Report::new(err),
            AppError::Unexpected(report) => report,
        }
    }

    /// Returns the user-facing error, if this is one
    pub fn user_facing(&self) -> Option<&UserFacingError> {
        match self {
            AppError::UserFacing(err) => Some(err),
            AppError::Unexpected(_) => None,
        }
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UserFacing(err) => write!(f, "{err:?}"),
            AppError::Unexpected(report) => write!(f, "{report:?}"),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UserFacing(err) => write!(f, "{err}"),
            AppError::Unexpected(report) => write!(f, "{report}"),
        }
    }
}

impl From<UserFacingError> for AppError {
    fn from(err: UserFacingError) -> Self {
        Self::UserFacing(err)
    }
}

impl From<Report> for AppError {
    fn from(report: Report) -> Self {
        Self::Unexpected(report)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::Unexpected(err.into())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_user_facing_into_report_keeps_message() {
        let err = AppError::from(UserFacingError::FeedDecode(String::from("missing field `name`")));
        assert_eq!(err.user_facing(), Some(&UserFacingError::FeedDecode("missing field `name`".into())));
        assert_eq!(
            err.into_report().to_string(),
            "Failed to decode the feed: missing field `name`"
        );
    }

    #[test]
    fn test_unexpected_is_not_user_facing() {
        let err = AppError::from(Report::msg("boom"));
        assert!(err.user_facing().is_none());
        assert_eq!(err.to_string(), "boom");
    }
}
