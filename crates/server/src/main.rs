use db::DBService;
use server::{AppState, http};
use tracing_subscriber::{EnvFilter, prelude::*};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
const DEFAULT_DATABASE_URL: &str = "sqlite://taskboard.sqlite?mode=rwc";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},services={level},auth={level},db={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).expect("Failed to create tracing filter");
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = DBService::new(&database_url).await?;
    let state = AppState::new(db);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, http::router(state)).await?;
    Ok(())
}
