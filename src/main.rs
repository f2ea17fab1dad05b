use std::{panic::AssertUnwindSafe, process};

use app_grid::{
    app::App,
    cli::Cli,
    config::Config,
    errors, logging,
    service::FeedService,
};
use color_eyre::Result;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse cli arguments
    let cli = Cli::parse_extended();

    // Initialize the config
    let mut config = Config::init(cli.config.clone())?;
    if let Some(feed_url) = cli.feed_url.clone() {
        config.feed.url = feed_url;
    }

    // Initialize logging
    let (logs_path, logs_filter) = logging::resolve_path_and_filter(&config);
    logging::init(&logs_path, logs_filter)?;

    // Prepare a cancellation token
    let cancellation_token = CancellationToken::new();
    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Received ctrl-c, cancelling");
        ctrl_c_token.cancel();
    });

    // Run the app, with error and panic handling
    errors::init(
        logs_path,
        AssertUnwindSafe(async move {
            let service = FeedService::new(&config);
            let output = App::new(cancellation_token)?
                .run(config, service, cli.into_process())
                .await?;

            if let Some(stderr) = output.stderr_text() {
                eprintln!("{stderr}");
            }
            if let Some(stdout) = output.stdout_text() {
                println!("{stdout}");
            }
            if output.is_failure() {
                tracing::info!("[exit code] 1");
                process::exit(1);
            }
            tracing::info!("[exit code] 0");
            Ok(())
        }),
    )
    .await
}
