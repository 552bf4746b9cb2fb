//! # board-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the board application.
//! Binds to a configurable port (default 8080).

use board_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    // Without a user client, writer names come from the local user table.
    let default_user_api = config.local_base_url();
    let user_client = match board_user_client::UserClientConfig::from_env(&default_user_api) {
        Ok(client_config) => {
            tracing::info!(base_url = %client_config.base_url, "user API client configured");
            match board_user_client::UserClient::new(client_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("Failed to create user API client: {e}");
                    return Err(e.into());
                }
            }
        }
        Err(e) => {
            tracing::warn!("User API client not configured: {e}. Writer names resolve locally.");
            None
        }
    };

    let state = AppState::with_config(config, user_client);
    let app = board_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Board listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
