//! Gym schedule service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gym_schedule::api::{create_router, AppState};
use gym_schedule::config::Config;
use gym_schedule::error::AppError;
use gym_schedule::metrics;
use gym_schedule::schedule::{MemoryScheduleStore, MongoScheduleStore, ScheduleStore};
use gym_schedule::utils::shutdown_signal;

/// Gym class schedule service.
#[derive(Parser, Debug)]
#[command(name = "gym-schedule")]
#[command(about = "CRUD HTTP API for gym class schedules")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Run {
        /// Serve from an in-process store instead of MongoDB.
        #[arg(long)]
        in_memory: bool,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Connect to MongoDB and ping it.
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("gym_schedule=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Ping) => cmd_ping().await,
        Some(Command::Run { in_memory }) => cmd_run(args.port, in_memory).await,
        None => cmd_run(args.port, false).await,
    }
}

/// Load and validate configuration, applying the CLI port override.
fn load_config(port_override: Option<u16>) -> gym_schedule::Result<Config> {
    let mut config = Config::load()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    config.checked().map_err(|e| {
        error!("{}", e);
        e
    })
}

/// Bind the listener and serve until a shutdown signal arrives.
async fn serve(port: u16, app_state: AppState) -> gym_schedule::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server is running on http://localhost:{}", port);

    let router = create_router(app_state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("GYM SCHEDULE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    println!("  MongoDB URI: {}", config.mongodb_uri);
    println!("  Database: {}", config.mongodb_database);
    println!("  Collection: {}", config.mongodb_collection);
    println!("  Log level: {}", config.rust_log);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Connect to MongoDB and ping it.
async fn cmd_ping() -> anyhow::Result<()> {
    let config = load_config(None)?;

    print!("Connecting to {}... ", config.mongodb_uri);
    let store = MongoScheduleStore::connect(&config)
        .await
        .map_err(AppError::Store)?;
    println!("OK");

    print!("Pinging... ");
    match store.ping().await {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            Err(anyhow::anyhow!("MongoDB ping failed"))
        }
    }
}

/// Serve the HTTP API.
async fn cmd_run(port_override: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config(port_override)?;
    info!("Configuration loaded successfully");

    // Create store
    let store: Arc<dyn ScheduleStore> = if in_memory {
        warn!("Serving from in-memory store; records are lost on exit");
        Arc::new(MemoryScheduleStore::new())
    } else {
        Arc::new(
            MongoScheduleStore::connect(&config)
                .await
                .map_err(AppError::Store)?,
        )
    };

    // Create app state
    let mut app_state = AppState::new(store);
    match metrics::install_recorder() {
        Ok(handle) => app_state = app_state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    // Startup liveness check; /ready keeps reporting until the store answers
    match app_state.check_store().await {
        Ok(()) => info!("Successfully connected to the schedule store"),
        Err(e) => error!("Error connecting to the schedule store: {}", e),
    }

    // Start HTTP server
    serve(config.port, app_state).await?;

    info!("Server stopped");
    Ok(())
}
