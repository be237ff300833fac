//! Warbanner lobby server binary.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use warbanner_lobby::LobbyConfig;
use warbanner_server::AppState;

#[derive(Parser, Debug)]
#[command(name = "warbanner-server", about = "Battleground lobby server")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Minimum participants before a lobby can start.
    #[arg(long, default_value_t = 2)]
    min_players: usize,

    /// Participant cap per lobby. Unlimited when omitted.
    #[arg(long)]
    max_participants: Option<usize>,

    /// Maximum number of concurrent lobbies.
    #[arg(long, default_value_t = 10)]
    max_lobbies: usize,

    /// Seconds before a waiting lobby expires.
    #[arg(long, default_value_t = 3600)]
    lobby_timeout_secs: u64,

    /// Seconds between expiry sweeps.
    #[arg(long, default_value_t = 60)]
    sweep_interval_secs: u64,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = LobbyConfig {
        min_players: args.min_players,
        max_participants: args.max_participants,
        max_lobbies: args.max_lobbies,
        lobby_timeout: Duration::from_secs(args.lobby_timeout_secs),
    };

    let state = Arc::new(AppState::new(config));
    spawn_expiry_sweep(
        state.clone(),
        Duration::from_secs(args.sweep_interval_secs),
    );

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(addr = %args.bind, "warbanner server listening");
    axum::serve(listener, warbanner_server::app(state)).await
}

/// Periodically removes waiting lobbies that outlived the configured
/// timeout. Started lobbies are never touched.
fn spawn_expiry_sweep(state: Arc<AppState>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = state.registry.lock().await.remove_expired().await;
            if !removed.is_empty() {
                tracing::info!(count = removed.len(), "expired lobbies removed");
            }
        }
    });
}
