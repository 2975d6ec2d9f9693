use axum::routing::get;
use axum::Router;
use tracing_subscriber::EnvFilter;

use kg_qa::api;
use kg_qa::config::Config;
use kg_qa::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Graph database: {} (db {})", config.graph.url, config.graph.database);
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);

    let state = AppState::new(config).await?;
    let bind_addr = state.config.bind_addr.clone();

    let app = Router::new()
        .route("/", get(api::query::health))
        .route("/query/{query}", get(api::query::ask))
        .route("/api/schema", get(api::schema::get_schema))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
