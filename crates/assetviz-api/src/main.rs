use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "assetviz")]
#[command(about = "Serve the IT asset connectivity graph over HTTP")]
struct Cli {
    /// Config file prefix (default: assetviz).
    #[arg(short, long, default_value = "assetviz", global = true)]
    config: String,

    /// Override the listening port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the static bundle directory.
    #[arg(long)]
    static_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Load a JSON seed document (asset types, assets, connections) and exit.
    Load {
        /// Path to the seed document.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let mut config = assetviz_api::config::load(&cli.config)?;

    if let Some(Command::Load { file }) = &cli.command {
        let summary = assetviz_api::seed::load(&config.graph, file).await?;
        tracing::info!(
            file = %file.display(),
            assets = summary.assets,
            connections = summary.connections,
            "Seed complete"
        );
        return Ok(());
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = cli.static_dir {
        config.server.static_dir = Some(dir);
    }

    tracing::info!(
        uri = %config.graph.uri(),
        namespace = %config.graph.namespace,
        port = config.server.port,
        "Starting assetviz"
    );

    assetviz_api::run(config).await?;
    Ok(())
}
