//! Binary entrypoint for the kvgraph HTTP server.
//!
//! Configuration comes from environment variables, see
//! [`kvgraph_server::config`].

use tokio::sync::broadcast::error::RecvError;

use kvgraph_server::config::ServerConfig;
use kvgraph_server::router::build_router;
use kvgraph_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().expect("Invalid server configuration");
    let state = AppState::new(&config).expect("Failed to initialize application state");

    // Signalled operations have no caller; their replies are published here.
    let mut egress = state.service.runtime().subscribe();
    tokio::spawn(async move {
        loop {
            match egress.recv().await {
                Ok(published) => tracing::info!(
                    query_id = %published.query_id,
                    address = %published.address,
                    status = ?published.reply.status,
                    result = %published.reply.result,
                    "signal reply"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("egress log lagged, {} replies skipped", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("kvgraph server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
