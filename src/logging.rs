use std::{
    env,
    fs::File,
    path::{Path, PathBuf},
};

use color_eyre::{Result, eyre::Context};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

/// Environment variable that overrides the configured filter
pub const LOG_ENV_VAR: &str = "APP_GRID_LOG";

/// Filter applied when logs are not enabled, failures are always recorded
const DIAGNOSTICS_FILTER: &str = "warn";

/// Resolves the log path and filter based on the config and environment variable.
///
/// Warnings and errors are always written, enabling the logs only widens the filter.
pub fn resolve_path_and_filter(config: &Config) -> (PathBuf, String) {
    let logs_path = config.data_dir.join("app-grid.log");
    let filter = match env::var(LOG_ENV_VAR) {
        Ok(env_filter) => env_filter,
        Err(_) if config.logs.enabled => config.logs.filter.clone(),
        Err(_) => String::from(DIAGNOSTICS_FILTER),
    };
    (logs_path, filter)
}

/// Initializes the tracing subscriber to output logs to a file.
///
/// The TUI owns the terminal, so diagnostics (like feed decode failures) never go to stdout or stderr.
pub fn init(logs_path: &Path, filter: String) -> Result<()> {
    let log_file = File::create(logs_path)
        .wrap_err_with(|| format!("Couldn't create the log file: {}", logs_path.display()))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .parse(filter)
        .wrap_err("Couldn't parse the log filter")?;
    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);
    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config_still_records_failures() {
        let mut config = Config::default();
        config.data_dir = PathBuf::from("/tmp/app-grid");
        assert!(!config.logs.enabled);
        // The env var might be set by whoever runs the tests
        if env::var(LOG_ENV_VAR).is_err() {
            let (path, filter) = resolve_path_and_filter(&config);
            assert_eq!(path, PathBuf::from("/tmp/app-grid/app-grid.log"));
            assert_eq!(filter, "warn");
        }
    }

    #[test]
    fn test_enabled_logs_use_config_filter() {
        let mut config = Config::default();
        config.logs.enabled = true;
        config.logs.filter = String::from("app_grid=trace");
        let (_, filter) = resolve_path_and_filter(&config);
        let expected = env::var(LOG_ENV_VAR).unwrap_or_else(|_| String::from("app_grid=trace"));
        assert_eq!(filter, expected);
    }
}
