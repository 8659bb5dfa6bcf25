//! sipcfg Daemon - Main entry point
//!
//! Serves SIP phone provisioning payloads keyed by MAC address.

mod api;
mod config;
mod server;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "sipcfg")]
#[command(about = "SIP phone provisioning server")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "sipcfg.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the provisioning payload for one MAC address and exit
    #[arg(long, value_name = "MAC")]
    render: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("sipcfg v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;

    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }

    info!(
        domain = %config.provisioning.domain,
        port = %config.provisioning.port,
        codecs = %config.provisioning.codecs,
        "Configuration loaded"
    );

    let state = state::AppState::new(config.clone())?;

    if let Some(mac) = args.render {
        // Single payload mode
        let payload = state.provision(&mac).await?;
        println!("{}", payload.body);
    } else {
        server::run(state, &config.daemon.bind, config.daemon.tls.as_ref()).await?;
    }

    Ok(())
}
