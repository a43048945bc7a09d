mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use llm::GenerateContent;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Missing credentials are non-fatal: transform requests report them per call.
    let generator: Option<Arc<dyn GenerateContent>> = match llm::GeminiClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "generation client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "generation client not configured; transforms disabled");
            None
        }
    };

    let state = state::AppState::new(generator);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "wheelz listening");
    axum::serve(listener, app).await.expect("server failed");
}
