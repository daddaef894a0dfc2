use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use warmer::{Target, warm};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Which cache region to fill.
    #[arg(long, value_enum, default_value_t = Target::All)]
    region: Target,

    /// Drop the live key first so the region is always refetched.
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    warm(args.region, args.force).await
}
