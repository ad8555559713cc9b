//! Gomoku client application entry point.
//!
//! Wires together the transport connector, heartbeat, credential store, and
//! the dispatch loop, then runs until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config() + CLI overrides
//!  └─ ServerConnection::start()   -- WebSocket reconnect loop
//!  └─ spawn_heartbeat()           -- periodic keepalive ping
//!  └─ dispatch loop
//!       ├─ Connected              -> replay persisted token, if any
//!       ├─ Disconnected           -> reconnect handled by the connector
//!       └─ MessageReceived(msg)   -> session / rooms / game handlers
//! ```
//!
//! The dispatch loop is the single owner of [`ClientContext`]; every piece
//! of client state mutates there and nowhere else.  Headless operation uses
//! the tracing-backed notifier; a graphical front end swaps in its own
//! `Notifier` and `BoardRenderer` without touching anything here.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gomoku_client::application::{handle_network_event, ClientContext, CredentialStore, MessageSink, Notifier};
use gomoku_client::infrastructure::heartbeat::spawn_heartbeat;
use gomoku_client::infrastructure::network::{FixedDelay, ServerConnection};
use gomoku_client::infrastructure::storage::config::{load_config, load_config_from};
use gomoku_client::infrastructure::storage::credentials::FileCredentialStore;
use gomoku_client::infrastructure::ui_bridge::TracingNotifier;

/// Gomoku client: connects to a game server and keeps local state in sync.
#[derive(Debug, Parser)]
#[command(name = "gomoku-client", version, about)]
struct Args {
    /// Game server host (and optional port); overrides the config file.
    #[arg(long, env = "GOMOKU_SERVER_HOST")]
    server_host: Option<String>,

    /// Use the secure channel variant (wss); overrides the config file.
    #[arg(long, env = "GOMOKU_SECURE")]
    secure: bool,

    /// Path to an alternative config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // ── Configuration ─────────────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => load_config().context("failed to load config")?,
    };
    if let Some(host) = args.server_host {
        config.server.host = host;
    }
    if args.secure {
        config.server.secure = true;
    }

    // ── Logging ───────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.client.log_level.clone())),
        )
        .init();

    info!("Gomoku client starting");

    // ── Collaborators ─────────────────────────────────────────────────────────
    let credentials: Arc<dyn CredentialStore> = Arc::new(
        FileCredentialStore::at_default_location()
            .context("failed to locate the credential store")?,
    );
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

    // ── Network connection ────────────────────────────────────────────────────
    let endpoint = config.server.endpoint_url();
    info!("server endpoint: {endpoint}");

    let connection = Arc::new(ServerConnection::new(endpoint));
    let running = Arc::new(AtomicBool::new(true));

    let policy = FixedDelay::new(Duration::from_millis(config.connection.reconnect_delay_ms));
    let mut network_rx = Arc::clone(&connection)
        .start(Box::new(policy), Arc::clone(&running))
        .await;

    // ── Heartbeat ─────────────────────────────────────────────────────────────
    let heartbeat = spawn_heartbeat(
        Arc::clone(&connection) as Arc<dyn MessageSink>,
        Duration::from_secs(config.connection.heartbeat_interval_secs),
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    // ── Main dispatch loop ────────────────────────────────────────────────────
    let mut ctx = ClientContext::new(
        Arc::clone(&connection) as Arc<dyn MessageSink>,
        notifier,
        credentials,
    );

    info!("Gomoku client ready; connecting…");

    while let Some(event) = network_rx.recv().await {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        handle_network_event(&mut ctx, event);
    }

    heartbeat.abort();
    info!("Gomoku client stopped");
    Ok(())
}
