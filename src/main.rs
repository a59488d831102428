use clap::Parser;
use clipsync::bootstrap::init_tracing_subscriber;
use clipsync::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_subscriber(cli.log_dir.as_deref())?;
    clipsync::commands::dispatch(cli).await
}
