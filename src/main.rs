mod db;
mod routes;
mod services;
mod state;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // A missing .env file is normal outside local development.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .map_or(Ok(DEFAULT_PORT), |raw| raw.parse())
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    let state = state::AppState::new(pool);
    let app = routes::app(state, routes::allowed_origins_from_env());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "buildeasy listening");
    axum::serve(listener, app).await.expect("server failed");
}
