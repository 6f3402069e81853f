use std::{net::SocketAddr, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{self, BufReader};
use tracing::{error, Level};

use hotel::{config::HotelConfig, menu::Menu, HotelClient};

/// Console client of the hotel booking service.
#[derive(Parser, Debug)]
#[command(name = "hotel-client", version)]
struct Args {
    /// Configuration file, `hotel.toml` in the working directory by default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address of the registry
    #[arg(short, long)]
    registry: Option<SocketAddr>,

    /// Name the service is bound under
    #[arg(short, long)]
    name: Option<String>,

    /// Connect to this service address directly, skipping the registry
    #[arg(long)]
    connect: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match HotelConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            error!("loading configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // The menu owns stdout.
    tracing_subscriber::fmt()
        .with_max_level(Level::from(&config.logger.level))
        .with_writer(std::io::stderr)
        .init();

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: HotelConfig) -> Result<()> {
    let client = match args.connect {
        Some(addr) => HotelClient::connect(addr)
            .await
            .context("connecting to hotel service")?,
        None => {
            let registry = args.registry.unwrap_or(config.registry.address);
            let name = args.name.unwrap_or(config.service.name);
            HotelClient::lookup(registry, &name)
                .await
                .with_context(|| format!("looking up {name:?} in registry {registry}"))?
        }
    };

    let mut menu = Menu::new(client, BufReader::new(io::stdin()), io::stdout());
    menu.run().await.context("running menu")?;

    Ok(())
}
