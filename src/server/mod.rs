pub mod handlers;
pub mod types;

use crate::{
    Error, Result, config::Config, recommendation::RecommendationModel,
    sentiment::SentimentModel,
};
use axum::{Router, routing::post};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn sentiment_router(model: Arc<SentimentModel>) -> Router {
    let app_state = handlers::SentimentState { model };

    Router::new()
        .route("/sentimen/predict", post(handlers::predict_sentiment))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub fn recommendation_router(model: Arc<RecommendationModel>) -> Router {
    let app_state = handlers::RecommendationState { model };

    Router::new()
        .route("/predict", post(handlers::predict_recommendation))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run_sentiment(config: Config) -> Result<()> {
    let model = SentimentModel::load(&config.sentiment).await?;
    let app = sentiment_router(Arc::new(model));

    serve(app, &config.sentiment.host, config.sentiment.port).await
}

pub async fn run_recommendation(config: Config) -> Result<()> {
    let settings = config.recommendation.clone();

    // Training is CPU-bound; keep it off the async workers
    let model = tokio::task::spawn_blocking(move || RecommendationModel::load(&settings))
        .await
        .map_err(|e| Error::internal(format!("training task failed: {}", e)))??;
    let app = recommendation_router(Arc::new(model));

    serve(
        app,
        &config.recommendation.host,
        config.recommendation.port,
    )
    .await
}

async fn serve(app: Router, host: &str, port: u16) -> Result<()> {
    let addr = SocketAddr::new(host.parse()?, port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
