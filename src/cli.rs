use std::path::PathBuf;

use clap::{
    Args, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::styling::Style,
};
use itertools::Itertools;
use tracing::instrument;

use crate::model::FilterMode;

/// Browse the apps of a remote feed in a searchable grid
///
/// While browsing:
/// - type anything to filter the apps, `esc` cancels the search
/// - `enter` exits printing the selected app
/// - `ctrl+r` fetches the feed again
#[derive(Parser)]
#[cfg_attr(debug_assertions, derive(Debug))]
#[command(
    author,
    version,
    verbatim_doc_comment,
    after_long_help = include_str!("_examples/cli.txt")
)]
pub struct Cli {
    /// Path of the config file to use (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Url of the feed to fetch, overwriting the one on the config
    #[arg(long, global = true)]
    pub feed_url: Option<String>,

    /// Options to browse the feed when no command is provided
    #[command(flatten)]
    pub browse: BrowseFeedProcess,

    /// Command to be executed, defaults to `browse`
    #[command(name = "command", subcommand)]
    pub process: Option<CliProcess>,
}

#[derive(Subcommand)]
#[cfg_attr(debug_assertions, derive(Debug))]
pub enum CliProcess {
    /// Opens the interactive grid of apps
    #[command(after_long_help = include_str!("_examples/browse.txt"))]
    Browse(BrowseFeedProcess),

    /// Prints the apps of the feed, one per line
    #[command(after_long_help = include_str!("_examples/list.txt"))]
    List(ListFeedProcess),
}

/// Opens the interactive grid of apps
#[derive(Args, Debug, Default)]
pub struct BrowseFeedProcess {
    /// Initial search query to filter the apps
    pub query: Option<String>,

    /// Search mode, overwriting the default one on the config
    #[arg(short = 'm', long)]
    pub mode: Option<FilterMode>,
}

/// Prints the apps of the feed
#[derive(Args, Debug, Default)]
pub struct ListFeedProcess {
    /// Search query to filter the apps
    pub query: Option<String>,

    /// Search mode, overwriting the default one on the config
    #[arg(short = 'm', long)]
    pub mode: Option<FilterMode>,

    /// Print the apps as a JSON array, with the same fields as the feed
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parses the [Cli] command, with any runtime extension required
    #[instrument]
    pub fn parse_extended() -> Self {
        // Command definition
        let mut cmd = Self::command();

        // Update after_long_help to match the style, if present
        let style = cmd.get_styles().clone();
        let dimmed = style.get_placeholder().dimmed();
        let plain_examples_header = "Examples:";
        let styled_examples_header = format!(
            "{}Examples:{}",
            style.get_usage().render(),
            style.get_usage().render_reset()
        );
        style_after_long_help(&mut cmd, &dimmed, plain_examples_header, &styled_examples_header);

        // Parse the arguments
        let matches = cmd.get_matches();

        // Convert the argument matches back into the strongly typed `Cli` struct
        match Cli::from_arg_matches(&matches) {
            Ok(args) => args,
            Err(err) => err.exit(),
        }
    }

    /// Retrieves the process to run, browsing the feed when none was provided
    pub fn into_process(self) -> CliProcess {
        self.process.unwrap_or(CliProcess::Browse(self.browse))
    }
}

fn style_after_long_help(
    command_ref: &mut Command,
    dimmed: &Style,
    plain_examples_header: &str,
    styled_examples_header: &str,
) {
    let mut command = std::mem::take(command_ref);
    if let Some(after_long_help) = command.get_after_long_help() {
        let current_help_text = after_long_help.to_string();
        let modified_help_text = current_help_text
            // Replace the examples header to match the same usage style
            .replace(plain_examples_header, styled_examples_header)
            // Style the comment lines to be dimmed
            .lines()
            .map(|line| {
                if line.trim_start().starts_with('#') {
                    format!("{}{}{}", dimmed.render(), line, dimmed.render_reset())
                } else {
                    line.to_string()
                }
            })
            .join("\n");
        command = command.after_long_help(modified_help_text);
    }
    for subcommand_ref in command.get_subcommands_mut() {
        style_after_long_help(subcommand_ref, dimmed, plain_examples_header, styled_examples_header);
    }
    *command_ref = command;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli_asserts() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_browse_is_the_default() {
        let cli = Cli::try_parse_from(["app-grid"]).unwrap();
        assert!(matches!(
            cli.into_process(),
            CliProcess::Browse(BrowseFeedProcess { query: None, mode: None })
        ));
    }

    #[test]
    fn test_browse_query_without_command() {
        let cli = Cli::try_parse_from(["app-grid", "Piano", "-m", "structural"]).unwrap();
        let CliProcess::Browse(browse) = cli.into_process() else {
            panic!("Expected a browse process");
        };
        assert_eq!(browse.query.as_deref(), Some("Piano"));
        assert_eq!(browse.mode, Some(FilterMode::Structural));
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from([
            "app-grid",
            "list",
            "Notes",
            "--mode",
            "structural",
            "--json",
            "--feed-url",
            "http://localhost/feed.json",
        ])
        .unwrap();
        assert_eq!(cli.feed_url.as_deref(), Some("http://localhost/feed.json"));
        let CliProcess::List(list) = cli.into_process() else {
            panic!("Expected a list process");
        };
        assert_eq!(list.query.as_deref(), Some("Notes"));
        assert_eq!(list.mode, Some(FilterMode::Structural));
        assert!(list.json);
    }

    #[test]
    fn test_parse_browse_with_query() {
        let cli = Cli::try_parse_from(["app-grid", "--config", "/tmp/config.toml", "browse", "Piano"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
        let CliProcess::Browse(browse) = cli.into_process() else {
            panic!("Expected a browse process");
        };
        assert_eq!(browse.query.as_deref(), Some("Piano"));
    }
}
