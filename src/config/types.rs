use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_sentiment_port")]
    pub port: u16,
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer_path: PathBuf,
    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,
    #[serde(default = "default_label_encoder_path")]
    pub label_encoder_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_recommendation_port")]
    pub port: u16,
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_sentiment_port(),
            vectorizer_path: default_vectorizer_path(),
            classifier_path: default_classifier_path(),
            label_encoder_path: default_label_encoder_path(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_recommendation_port(),
            dataset_path: default_dataset_path(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_sentiment_port() -> u16 {
    8000
}

fn default_recommendation_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_vectorizer_path() -> PathBuf {
    PathBuf::from("artifacts/tfidf_vectorizer.json")
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from("artifacts/random_forest_model.json")
}

fn default_label_encoder_path() -> PathBuf {
    PathBuf::from("artifacts/label_encoder.json")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("financial_transaction_dataset-tanpa_judul.csv")
}

fn default_min_samples_split() -> usize {
    2
}
