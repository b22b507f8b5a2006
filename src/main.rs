use anyhow::Result;
use tracing::info;

use qld_petitions::config::Config;
use qld_petitions::pipeline::run_with_sqlite;
use qld_petitions::utils::http::HttpFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qld_petitions=info".parse()?),
        )
        .init();

    info!("Starting petition harvest");

    let config = Config::load()?;
    let fetcher = HttpFetcher::new(&config)?;

    let summary = run_with_sqlite(&config, &fetcher).await?;

    info!(
        "Completed successfully: {} added, {} already present",
        summary.added, summary.skipped
    );
    Ok(())
}
