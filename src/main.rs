use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use dockpane::app::App;
use dockpane::config::Config;
use dockpane::runtime::CliRuntime;

/// Dockpane - container and image dashboard
#[derive(Parser, Debug)]
#[command(name = "dockpane")]
#[command(about = "A terminal dashboard for Docker-compatible containers and images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<std::path::PathBuf>,

    /// Runtime program to invoke (docker, podman, or a path)
    #[arg(short, long, value_name = "PROGRAM", global = true)]
    runtime: Option<String>,

    /// Refresh interval in milliseconds
    #[arg(short, long, value_name = "MS", global = true)]
    interval_ms: Option<u64>,

    /// Enable debug logging to file
    #[arg(short, long, global = true)]
    debug: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the TUI (default)
    #[command(alias = "tui")]
    Run,

    /// Write a default configuration file (to --config, or the per-user location)
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            print_version();
            Ok(())
        }
        Some(Commands::InitConfig { force }) => init_config(cli.config, force),
        Some(Commands::Run) | None => run_tui(cli).await,
    }
}

fn print_version() {
    println!("dockpane {}", env!("CARGO_PKG_VERSION"));
    println!(
        "Platform: {} {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

fn init_config(path: Option<std::path::PathBuf>, force: bool) -> Result<()> {
    let path = path
        .or_else(Config::default_path)
        .ok_or_else(|| anyhow::anyhow!("No config directory found; pass --config FILE"))?;
    Config::init(&path, force)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

async fn run_tui(cli: Cli) -> Result<()> {
    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI arguments
    let config = apply_cli_overrides(config, &cli);
    config.validate()?;

    init_logging(&cli, &config);
    info!("Starting Dockpane v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded successfully");

    // Check the runtime tool is reachable; the dashboard still starts without it
    let runtime = CliRuntime::from_config(&config.runtime);
    match runtime.ping().await {
        Ok(version) => info!("Using {}: {}", runtime.program(), version),
        Err(e) => {
            warn!("Could not reach {}: {}", runtime.program(), e);
            eprintln!("⚠️  Warning: Could not run '{}'.", runtime.program());
            eprintln!("   Please ensure it is installed and the daemon is running.");
            eprintln!("   Error: {}", e.user_message());
        }
    }

    let mut app = App::new(config);
    app.run().await?;

    info!("Dockpane shutting down gracefully");
    Ok(())
}

/// Log to a file only, never stdout, so the TUI is not disturbed
fn init_logging(cli: &Cli, config: &Config) {
    let log_level = if cli.debug {
        "debug"
    } else {
        cli.log_level.as_deref().unwrap_or(&config.logging.level)
    };

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.logging.file_path())
        .ok();

    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(format!("dockpane={}", log_level))
            .with_writer(std::sync::Arc::new(file))
            .with_ansi(false)
            .init();
    } else {
        // If can't open log file, disable logging
        tracing_subscriber::fmt().with_env_filter("off").init();
    }
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(program) = &cli.runtime {
        config.runtime.program = program.clone();
    }
    if let Some(interval) = cli.interval_ms {
        config.general.poll_interval_ms = interval;
    }
    config
}
