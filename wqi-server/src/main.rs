//! wqi-server binary: the water-quality monitoring web application.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use wqi_server::config::Config;
use wqi_server::state::AppState;

#[derive(Parser)]
#[command(
    name = "wqi-server",
    version,
    about = "Water-quality monitoring web application"
)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Directory for the database file and the IoT CSV log
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// SQLite database filename inside the data directory
    #[arg(long, default_value = "wqi.db")]
    database: String,

    /// JSON file overriding the built-in parameter profile
    #[arg(long)]
    profile: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.data_dir, &cli.database, cli.profile.as_deref())?;
    let state = Arc::new(AppState::new(config)?);
    let app = wqi_server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("shut down cleanly");
    Ok(())
}

/// Resolves on ctrl-c or SIGTERM so in-flight requests can finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::warn!("failed to install ctrl-c handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::warn!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received");
}
