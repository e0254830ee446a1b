#![forbid(unsafe_code)]
use anyhow::Result;
use axum::Router;
use roombook::api::{self, AppState};
use roombook::db;
use std::env;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    timeout::TimeoutLayer,
};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv()?;

    info!("Starting server");

    let conn = db::open(env::var("DATABASE_PATH")?)?;
    let state = AppState::new(conn);

    let middleware = tower::ServiceBuilder::new()
        .layer(CompressionLayer::new().quality(tower_http::CompressionLevel::Fastest))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive());

    // build our application with routes
    let app = Router::new()
        .nest("/api/people", api::people_api())
        .nest("/api/rooms", api::rooms_api())
        .nest("/api/bookings", api::bookings_api())
        .layer(middleware)
        .with_state(state);

    // run our app with hyper, listening globally on the configured port
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", env::var("PORT")?)).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
