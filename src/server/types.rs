use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub rekomendasi: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct InvalidInputResponse {
    pub error: String,
    pub detail: String,
}
