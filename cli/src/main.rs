//! Tourbook: CLI server
//!
//! Headless booking service suitable for deployment as a systemd service,
//! Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/tourbook/config.toml)
//! tourbook-service
//!
//! # Custom config path
//! tourbook-service --config /etc/tourbook/config.toml
//!
//! # Override the port
//! tourbook-service --api-port 8080
//!
//! # Validate config without starting
//! tourbook-service --check
//!
//! # Complete finished departures and exit (run from cron)
//! tourbook-service --complete-departed
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use tourbook::config::AppConfig;
use tourbook::server::{complete_departed_once, init_tracing, BoxError, ServerHandle, ServerOptions};

/// Tourbook: reservations and seat accounting for tour departures.
#[derive(Parser, Debug)]
#[command(
    name = "tourbook-service",
    version,
    about = "Booking backend for tour operators",
    long_about = "Tourbook REST API server: reservations, seat accounting and favourites.\n\n\
                  Default config: ~/.config/tourbook/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TOURBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Mark paid reservations of finished departures as completed, then exit.
    #[arg(long)]
    complete_departed: bool,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(tourbook::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) if cli.check => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!(
            "   Booking     : enforce_capacity={} rule={:?}",
            config.booking.enforce_capacity, config.booking.places_released_rule
        );
        return Ok(());
    }

    init_tracing(&config.logging);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    let opts = ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    };

    // ── One-shot completion job ────────────────────────────────
    if cli.complete_departed {
        let outcome = complete_departed_once(opts).await?;
        info!(
            completed = outcome.updated.len(),
            "Departed reservations completed"
        );
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(opts).await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
