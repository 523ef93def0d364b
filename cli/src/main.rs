mod config;
mod error;
mod sources;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use socker_core::{Event, EventBus, ProxyConfig, Proxy, Socker};
use tracing::{error, info, warn};

use crate::config::SockerConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Demo runner for the socker proxy pool", long_about = None)]
struct Args {
    /// Path to the socker TOML configuration file.
    #[arg(short, long, default_value = "config/socker.toml")]
    config: String,

    /// Override the configured log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// How many acquire/discard cycles to demo before exiting. 0 runs
    /// until interrupted.
    #[arg(long, default_value_t = 10)]
    cycles: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = SockerConfig::load(&args.config)?;
    let log_level = args.log_level.unwrap_or_else(|| config.log_level.clone());
    telemetry::init_tracing(&log_level);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(config, args.cycles))
}

async fn run(config: SockerConfig, cycles: usize) -> Result<()> {
    info!(pool_size = config.pool_size, sources = config.sources.len(), "starting socker");

    let events = Arc::new(EventBus::new(256));
    spawn_event_logger(events.clone());

    let source_list = sources::build_sources(&config.sources)?;
    let orchestrator = Socker::new(source_list, events.clone());
    let pool = Proxy::new(
        orchestrator,
        events,
        ProxyConfig {
            pool_size: config.pool_size,
            low_water_fraction: config.low_water_fraction,
        },
    );

    pool.init().await?;
    info!(stats = ?pool.stats(), "pool initialized");

    let mut remaining = cycles;
    loop {
        if cycles != 0 && remaining == 0 {
            break;
        }

        match pool.acquire_exclusive() {
            Ok(connection) => {
                info!(id = %connection.id, host = %connection.endpoint.host, "acquired proxy");
                // Downstream HTTP client would route a request through
                // `connection` here; this demo just releases it back.
                pool.discard(&connection).expect("pool was initialized above");
            }
            Err(e) => {
                warn!(error = %e, "could not acquire a proxy this cycle");
            }
        }

        if cycles != 0 {
            remaining -= 1;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    info!(stats = ?pool.stats(), "demo complete");
    Ok(())
}

fn spawn_event_logger(events: Arc<EventBus>) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagged, some events were dropped");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

fn log_event(event: &Event) {
    match event {
        Event::PoolInitialized { size, .. } => info!(size, kind = event.kind(), "event"),
        Event::PoolInitFailed { error: e, .. } => error!(error = %e, kind = event.kind(), "event"),
        Event::PoolReplenished { added, .. } => info!(added, kind = event.kind(), "event"),
        Event::PoolReplenishFailed { error: e, .. } => {
            warn!(error = %e, kind = event.kind(), "event")
        }
        Event::ProxyReleaseFailed { error: e, .. } => {
            warn!(error = %e, kind = event.kind(), "event")
        }
        Event::SourceFailed { source_tag, error: e, .. } => {
            warn!(source_tag, error = %e, kind = event.kind(), "event")
        }
    }
}
