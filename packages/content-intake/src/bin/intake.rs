// Command-line entry point: print the text behind each locator

use anyhow::{Context, Result};
use clap::Parser;
use content_intake::{IntakeConfig, SourceKind};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "intake", about = "Extract plain text from websites, video transcripts and local files")]
struct Cli {
    /// Print the classified source kind instead of fetching
    #[arg(long)]
    kind: bool,

    /// URLs, video links or file paths
    #[arg(required = true)]
    locators: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so stdout only carries extracted text)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,content_intake=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.kind {
        for locator in &cli.locators {
            println!("{}\t{}", SourceKind::classify(locator), locator);
        }
        return Ok(());
    }

    let config = IntakeConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(?config, "Configuration loaded");
    let dispatcher = config.build_dispatcher()?;

    for locator in &cli.locators {
        let text = dispatcher.extract(locator).await;
        println!("{text}");
    }

    Ok(())
}
