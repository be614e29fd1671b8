use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use gamenight::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gamenight=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli).await {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
