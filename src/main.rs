//! podprobe: a Downward API diagnostic service.
//!
//! This is the application entry point. It reads configuration from the environment,
//! initializes tracing, logs the startup view of the pod metadata, sets up the Axum
//! router and serves until SIGTERM/SIGINT or a request to `/shutdown`.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use podprobe::config::{AppConfig, DEFAULT_LOG_FORMAT};
use podprobe::downward::{env_snapshot, list_podinfo, EnvSource, ProcessEnv};
use podprobe::http::{start_server, ShutdownSignal};
use podprobe::{create_router, AppState};

/// podprobe: report the Downward API metadata a pod was started with
#[derive(Parser, Debug)]
#[command(name = "podprobe", version, about)]
struct Args {
    /// Log level filter (e.g., "podprobe=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format: "text" or "json"
    #[arg(long, env = "LOG_FORMAT", default_value = DEFAULT_LOG_FORMAT)]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let env: Arc<dyn EnvSource> = Arc::new(ProcessEnv);
    let config = AppConfig::from_env(env.as_ref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| config.default_log_filter().to_string());
    init_tracing(&log_filter, &args.log_format);

    log_startup(&config, env.as_ref()).await;

    let signal = ShutdownSignal::new();
    let state = AppState::new(config.clone(), env, signal.clone());
    let app = create_router(state);

    start_server(app, &config, signal).await?;

    Ok(())
}

fn init_tracing(filter: &str, format: &str) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));

    if format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Log the configuration and pod metadata visible at startup.
async fn log_startup(config: &AppConfig, env: &dyn EnvSource) {
    tracing::info!(
        version = %config.version,
        build_time = %config.build_time,
        "Build metadata"
    );
    tracing::info!(
        app_context = %config.app_context,
        host = %config.host,
        port = config.port,
        debug = config.debug,
        "Loaded configuration"
    );

    for (key, value) in env_snapshot(env) {
        tracing::info!(key, value = %value, "Downward API env");
    }

    let dir = config.podinfo_dir.display();
    match list_podinfo(&config.podinfo_dir).await {
        Ok(names) => tracing::info!(dir = %dir, files = ?names, "Downward API volume"),
        Err(e) => tracing::info!(dir = %dir, error = %e, "No Downward API volume"),
    }
}
