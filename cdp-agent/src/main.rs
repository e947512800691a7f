#![forbid(unsafe_code)]

mod collaborators;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cdp::{load_from_path, Duplex, NeighborTable, Packet, PeriodicDriver};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use collaborators::{ConfiguredIdentity, ConfiguredInterfaceSource, LoggingFrameIo};

#[derive(Parser, Debug)]
#[command(author, version, about = "CDP neighbor-discovery agent")]
struct Cli {
    /// Path to the agent's TOML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config/agent.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match load_from_path(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            // Tracing isn't initialized yet if config loading fails before
            // we know the configured log level, so fall back to info.
            init_tracing("info");
            error!(%err, "failed to load configuration");
            std::process::exit(1);
        }
    };
    init_tracing(&cfg.logging.level);
    info!(links = ?cfg.links, transmit_interval_secs = cfg.transmit_interval_secs, "configuration loaded");

    let identity = ConfiguredIdentity::from_config(&cfg);
    let table = Arc::new(NeighborTable::new());
    let interfaces = Arc::new(ConfiguredInterfaceSource::new(cfg.links.clone()));
    let frame_io = Arc::new(LoggingFrameIo);

    let hold_time = cfg.hold_time_secs;
    let capabilities = cfg.capabilities;
    let device_id = identity.device_id;
    let software_version = identity.software_version;
    let platform = cfg.platform.clone();

    let build_frame: Arc<cdp::FrameBuilder> = Arc::new(move |link, addresses| {
        let mut packet = Packet::new(2);
        packet.ttl_secs = hold_time;
        packet.device_id = Some(device_id.clone());
        packet.software_version = Some(software_version.clone());
        packet.platform = Some(platform.clone());
        packet.port_id = Some(link.to_string());
        packet.capabilities = Some(capabilities);
        packet.duplex = Duplex::Full;
        packet.addresses = addresses.to_vec();

        let mut buf = vec![0u8; 1500];
        let written = cdp::serialize_packet(&packet, &mut buf)?;
        buf.truncate(written);
        Ok((packet, buf))
    });

    let driver = PeriodicDriver::spawn(
        table.clone(),
        interfaces,
        frame_io,
        build_frame,
        Duration::from_secs(cfg.reap_tick_secs),
        Duration::from_secs(cfg.transmit_interval_secs),
    );

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
    driver.shutdown(&table);
}

fn init_tracing(configured_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
