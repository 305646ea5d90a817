use anyhow::Result;
use clap::Parser;
use fxproxy::core::{AppConfig, log::init_logging};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Port to listen on (overrides PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = serve(&cli).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

async fn serve(cli: &Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config_path.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    fxproxy::run(config).await
}
