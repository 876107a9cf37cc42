use std::error::Error;
use std::net::SocketAddr;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use plan2meet_server::config::{Config, StoreBackend};
use plan2meet_server::routes::create_routes;
use plan2meet_server::state::AppState;
use plan2meet_server::store::{EventStore, InMemoryEventStore, PostgresEventStore};

const DEFAULT_LOG_FILTER: &str = "plan2meet_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env();
    let addr = config.bind_addr();

    match config.store {
        StoreBackend::Postgres => {
            let store =
                PostgresEventStore::connect(&config.database_url, config.max_connections).await?;
            tracing::info!("Successfully connected to database");

            store.migrate().await?;
            tracing::info!("Migrations run successfully");

            serve(store.clone(), addr).await?;
            store.close().await;
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory event store; events are lost on exit");
            serve(InMemoryEventStore::new(), addr).await?;
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn serve<S: EventStore>(store: S, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_routes(AppState::new(store));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}
