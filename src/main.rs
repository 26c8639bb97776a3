use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rivulet_relay::app::AppContext;
use rivulet_relay::cli::{Cli, Commands};
use rivulet_relay::config::Config;
use rivulet_relay::daemon::Daemon;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let ctx = AppContext::new(config)?;
    let daemon = Daemon::new(ctx)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            daemon.run().await?;
        }
        Commands::Once => {
            if let Some(report) = daemon.run_once().await {
                println!(
                    "{} new entries, {} of {} feeds failed",
                    report.scan.queued, report.scan.feeds_failed, report.scan.feeds_scanned
                );
            }
        }
    }

    Ok(())
}
