//! Batch Release - GMP batch disposition dashboard
//!
//! Serves the embedded release dashboard in front of the release backend,
//! and offers the same views and actions from the terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use batch_release::cli::{self, OutputFormat};
use batch_release::server;
use batch_release_shared::{ReleaseConfig, DEFAULT_BIND};

#[derive(Parser, Debug)]
#[command(name = "batch-release")]
#[command(version)]
#[command(about = "Batch release review and sign-off", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Port for the web UI
    #[arg(short, long, env = "BATCH_RELEASE_PORT", global = true)]
    port: Option<u16>,

    /// Address to bind the web UI to
    #[arg(long, env = "BATCH_RELEASE_BIND", global = true)]
    bind: Option<String>,

    /// Release backend the /api proxy forwards to
    #[arg(long, env = "BATCH_RELEASE_BACKEND_URL", global = true)]
    backend_url: Option<String>,

    /// Path to the TOML configuration file
    #[arg(short, long, env = "BATCH_RELEASE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Don't open browser automatically
    #[arg(long, global = true)]
    no_browser: bool,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Batch release server URL for CLI commands
    #[arg(long, default_value = "http://localhost:8080", env = "BATCH_RELEASE_URL", global = true)]
    url: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the dashboard server (default)
    Serve,

    /// Browse batches
    Batches {
        #[command(subcommand)]
        command: cli::BatchCommands,
    },

    /// Show the KPI snapshot
    Kpis {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List quality events
    Events {
        /// All, Temperature or Purity
        #[arg(long, default_value = "All")]
        filter: String,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show the reports summary
    Report {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Release a pending batch with a digital sign-off
    Release {
        /// Batch ID
        id: String,
        /// Reviewer name recorded on the release
        #[arg(long)]
        signed_by: String,
    },

    /// Reject a pending batch
    Reject {
        /// Batch ID
        id: String,
        /// Reject without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(&cli)?;

    // Create CLI client for terminal commands
    let client = || {
        cli::CliClient::new(
            &cli.url,
            config.backend.timeout_secs.map(Duration::from_secs),
        )
    };

    match &cli.command {
        None | Some(Commands::Serve) => {
            let open_browser = config.server.open_browser && !cli.no_browser;
            serve(&config, open_browser).await?;
        }
        Some(Commands::Batches { command }) => {
            command.execute(&client()?).await?;
        }
        Some(Commands::Kpis { format }) => {
            cli::show_kpis(&client()?, *format).await?;
        }
        Some(Commands::Events { filter, format }) => {
            cli::show_events(&client()?, filter, *format).await?;
        }
        Some(Commands::Report { format }) => {
            cli::show_report(&client()?, *format).await?;
        }
        Some(Commands::Release { id, signed_by }) => {
            cli::release(&client()?, id, signed_by).await?;
        }
        Some(Commands::Reject { id, force }) => {
            cli::reject(&client()?, id, *force).await?;
        }
        Some(Commands::Version) => {
            println!("Batch Release {}", env!("CARGO_PKG_VERSION"));
            println!("GMP batch disposition review and sign-off");
        }
    }

    Ok(())
}

/// Defaults, then the config file, then flags
fn load_config(cli: &Cli) -> anyhow::Result<ReleaseConfig> {
    let mut config = match &cli.config {
        // An explicit path must exist
        Some(path) => ReleaseConfig::load(path)?,
        None => match default_config_path() {
            Some(path) => ReleaseConfig::load_or_default(&path)?,
            None => ReleaseConfig::default(),
        },
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(url) = &cli.backend_url {
        config.backend.url = url.clone();
    }

    config.validate()?;
    Ok(config)
}

/// `~/.batch-release/config.toml`
fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".batch-release").join("config.toml"))
}

async fn serve(config: &ReleaseConfig, open_browser: bool) -> anyhow::Result<()> {
    info!("Starting Batch Release...");

    let (addr, server_handle) = server::start_server(config).await?;

    // 0.0.0.0 is not something a browser can open
    let host = if config.server.bind == "0.0.0.0" { DEFAULT_BIND } else { config.server.bind.as_str() };
    let ui_url = format!("http://{}:{}", host, addr.port());

    // Open browser
    if open_browser {
        info!("Opening browser...");
        if let Err(e) = open::that(&ui_url) {
            tracing::warn!("Failed to open browser: {}", e);
            info!("Please open {} in your browser", ui_url);
        }
    }

    info!("");
    info!("   Batch Release is running");
    info!("");
    info!("   Dashboard: {}", ui_url);
    info!("   Backend:   {}", config.backend.url);
    info!("");
    info!("   Press Ctrl+C to stop");
    info!("");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
        result = server_handle => {
            match result {
                Ok(Err(e)) => tracing::error!("Server error: {}", e),
                Err(e) => tracing::error!("Server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
    }

    info!("Batch Release stopped.");
    Ok(())
}
