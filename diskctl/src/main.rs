//! diskctl CLI
//!
//! Usage:
//!   diskctl                                   interactive console
//!   diskctl exec "mkdisk -size=5 -unit=M -path=/tmp/a.mia"
//!   diskctl exec --file setup.smia --user root --pass 123 --id 671A
//!   diskctl disks
//!   diskctl ls 671A /home

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use diskctl::cli::{Cli, Commands};
use diskctl::config::DiskctlConfig;
use diskctl::handlers::{self, Credentials, HandlerContext};
use diskctl::output;

/// Initialize tracing with the given verbosity level
///
/// - 0: warn (default)
/// - 1: info (-v)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Allow RUST_LOG to override if set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI first to get verbosity before initializing tracing
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = DiskctlConfig::load()?.with_engine_url(cli.engine_url);
    let colors = config.console.colors && !cli.no_color;
    let ctx = HandlerContext::new(config, output::default_output(colors)).with_json(cli.json);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => handlers::shell(&ctx).await?,
        Commands::Exec {
            text,
            file,
            user,
            pass,
            id,
        } => {
            let credentials = user.map(|user| Credentials {
                user,
                pass: pass.unwrap_or_default(),
                id: id.unwrap_or_default(),
            });
            handlers::exec(&ctx, text, file.as_deref(), credentials).await?
        }
        Commands::Disks => handlers::disks(&ctx).await?,
        Commands::Partitions { disk_path } => handlers::partitions(&ctx, &disk_path).await?,
        Commands::Ls { id, path } => handlers::ls(&ctx, &id, &path).await?,
        Commands::Journal { id } => handlers::journal(&ctx, &id).await?,
        Commands::Login { user, pass, id } => {
            handlers::login(&ctx, Credentials { user, pass, id }).await?
        }
    }

    Ok(())
}
