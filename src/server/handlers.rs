use super::types::{
    ErrorResponse, InvalidInputResponse, RecommendationResponse, SentimentRequest,
    SentimentResponse,
};
use crate::{recommendation::RecommendationModel, sentiment::SentimentModel};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct SentimentState {
    pub model: Arc<SentimentModel>,
}

#[derive(Clone)]
pub struct RecommendationState {
    pub model: Arc<RecommendationModel>,
}

pub async fn predict_sentiment(
    State(state): State<SentimentState>,
    Json(request): Json<SentimentRequest>,
) -> Result<Json<SentimentResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!("Received sentiment request ({} chars)", request.text.len());

    match state.model.predict(&request.text) {
        Ok(label) => {
            info!("Predicted sentiment: {}", label);
            Ok(Json(SentimentResponse {
                text: request.text,
                label,
            }))
        }
        Err(e) => {
            error!("Sentiment prediction failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Prediction error: {}", e),
                }),
            ))
        }
    }
}

pub async fn predict_recommendation(
    State(state): State<RecommendationState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, (StatusCode, Json<InvalidInputResponse>)> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("Rejected recommendation body: {}", rejection.body_text());
            return Err(invalid_input(rejection.body_text()));
        }
    };

    info!("Received recommendation request: {}", body);

    match state.model.predict_json(&body) {
        Ok(rekomendasi) => {
            info!("Recommended product: {}", rekomendasi);
            Ok(Json(RecommendationResponse { rekomendasi }))
        }
        Err(e) if e.is_client_error() => {
            warn!("Invalid recommendation input: {}", e);
            Err(invalid_input(e.to_string()))
        }
        Err(e) => {
            error!("Recommendation failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InvalidInputResponse {
                    error: "Prediction failed".to_string(),
                    detail: e.to_string(),
                }),
            ))
        }
    }
}

fn invalid_input(detail: String) -> (StatusCode, Json<InvalidInputResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(InvalidInputResponse {
            error: "Invalid input".to_string(),
            detail,
        }),
    )
}
