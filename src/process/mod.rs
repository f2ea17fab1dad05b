use color_eyre::Result;
use tokio_util::sync::CancellationToken;

use crate::{component::Component, config::Config, service::FeedService};

mod browse;
mod list;

/// Represents the final outcome of a [`Process`] execution
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    failed: bool,
    stdout: Option<String>,
    stderr: Option<String>,
}

impl ProcessOutput {
    /// Creates a new output for a successful execution
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a new output for a failed execution
    pub fn fail() -> Self {
        Self {
            failed: true,
            ..Default::default()
        }
    }

    /// Sets the text to be printed on the standard output
    pub fn stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    /// Sets the text to be printed on the standard error
    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    /// Whether the execution failed, so the program must exit with a non-zero code
    pub fn is_failure(&self) -> bool {
        self.failed
    }

    /// Retrieves the text to be printed on the standard output, if any
    pub fn stdout_text(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    /// Retrieves the text to be printed on the standard error, if any
    pub fn stderr_text(&self) -> Option<&str> {
        self.stderr.as_deref()
    }
}

/// Trait for non-interactive processes
#[trait_variant::make(Send)]
pub trait Process {
    /// Executes the process non-interactively and returns the output
    async fn execute(
        self,
        config: Config,
        service: FeedService,
        cancellation_token: CancellationToken,
    ) -> Result<ProcessOutput>;
}

/// Trait for processes that are rendered on the TUI
pub trait InteractiveProcess {
    /// Converts the process into a renderable component
    fn into_component(
        self,
        config: Config,
        service: FeedService,
        cancellation_token: CancellationToken,
    ) -> Result<Box<dyn Component>>;
}
