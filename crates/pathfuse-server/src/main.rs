//! Binary entrypoint for the pathfuse HTTP server.
//!
//! Configuration comes from `PATHFUSE_*` environment variables; see
//! [`pathfuse_server::config`].

use pathfuse_server::config::ServerConfig;
use pathfuse_server::router::build_router;
use pathfuse_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(&config).expect("Failed to initialize application state");
    let app = build_router(state);

    let addr = config.addr();
    tracing::info!("pathfuse server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
