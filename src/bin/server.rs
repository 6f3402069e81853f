use std::{net::SocketAddr, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tarpc::context;
use tracing::{error, info, warn, Level};

use hotel::{config::HotelConfig, registry, service, BookingStore};

/// Serves hotel bookings and publishes the service in a registry.
#[derive(Parser, Debug)]
#[command(name = "hotel-server", version)]
struct Args {
    /// Configuration file, `hotel.toml` in the working directory by default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address the booking service listens on
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Address of the registry
    #[arg(short, long)]
    registry: Option<SocketAddr>,

    /// Name to bind the service under
    #[arg(short, long)]
    name: Option<String>,

    /// Use an already running registry instead of starting one
    #[arg(long)]
    no_registry: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match HotelConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing_subscriber::fmt::init();
            error!("loading configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(Level::from(&config.logger.level))
        .init();

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, mut config: HotelConfig) -> Result<()> {
    if let Some(listen) = args.listen {
        config.service.listen = listen;
    }
    if let Some(registry) = args.registry {
        config.registry.address = registry;
    }
    if let Some(name) = args.name {
        config.service.name = name;
    }
    if args.no_registry {
        config.registry.embedded = false;
    }

    let embedded_registry = if config.registry.embedded {
        Some(
            registry::serve(config.registry.address)
                .await
                .context("starting registry")?,
        )
    } else {
        None
    };
    let registry_addr = embedded_registry
        .as_ref()
        .map_or(config.registry.address, |registry| registry.local_addr());

    let service = service::serve(config.service.listen, BookingStore::new())
        .await
        .context("starting hotel service")?;

    let registry_client = registry::connect(registry_addr)
        .await
        .context("connecting to registry")?;
    registry_client
        .bind(
            context::current(),
            config.service.name.clone(),
            service.local_addr(),
        )
        .await
        .context("binding service name")?;

    info!(
        name = %config.service.name,
        registry = %registry_addr,
        addr = %service.local_addr(),
        "hotel server is running"
    );

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!("shutting down");

    if let Err(err) = registry_client
        .unbind(context::current(), config.service.name.clone())
        .await
    {
        warn!("unbinding service name: {err:?}");
    }

    service.shutdown();
    if let Some(registry) = embedded_registry {
        registry.shutdown();
    }

    Ok(())
}
