#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use prediksi_rust::{
    config::{RecommendationConfig, SentimentConfig},
    model::{self, Classifier, DecisionTree, LabelEncoder, RandomForest, TfidfVectorizer, TreeOptions},
    recommendation::{RecommendationModel, read_dataset},
    sentiment::SentimentModel,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

/// Small training table with one clean split per product.
pub const DATASET: &str = "\
Usia,Jenis_Kelamin,Pendapatan_Bulanan,Saldo_Rekening,Riwayat_Pinjaman,Jenis_Transaksi_Favorit,Frekuensi_Transaksi,Produk_Direkomendasikan
22,Laki-laki,3000000,1500000,0,Transfer,12,Tabungan
25,Perempuan,3500000,2000000,0,Belanja Online,20,Tabungan
41,Laki-laki,15000000,90000000,1,Investasi,4,Deposito
47,Perempuan,18000000,120000000,1,Investasi,3,Deposito
33,Perempuan,8000000,10000000,1,Pembayaran Tagihan,9,Kredit
36,Laki-laki,9000000,12000000,1,Transfer,10,Kredit
";

/// Labelled reviews used to fit the sentiment fixtures.
pub const REVIEWS: [(&str, &str); 6] = [
    ("pelayanan sangat ramah dan cepat", "positif"),
    ("kamarnya bersih dan nyaman sekali", "positif"),
    ("pelayanan lambat dan petugas kasar", "negatif"),
    ("kamar kotor dan bau sekali", "negatif"),
    ("biasa saja tidak ada yang istimewa", "netral"),
    ("lumayan standar untuk harga segini", "netral"),
];

pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn recommendation_model() -> RecommendationModel {
    let records = read_dataset(DATASET.as_bytes()).unwrap();
    RecommendationModel::train(&records, &TreeOptions::default()).unwrap()
}

pub fn write_dataset(dir: &Path) -> PathBuf {
    let path = dir.join("financial_transaction_dataset.csv");
    std::fs::write(&path, DATASET).unwrap();
    path
}

pub fn recommendation_config(dataset_path: PathBuf) -> RecommendationConfig {
    RecommendationConfig {
        dataset_path,
        ..RecommendationConfig::default()
    }
}

/// Fits a vectorizer, a two-tree forest and a label encoder on [`REVIEWS`].
pub fn sentiment_parts() -> (TfidfVectorizer, Classifier, LabelEncoder) {
    let texts: Vec<&str> = REVIEWS.iter().map(|(text, _)| *text).collect();
    let labels = LabelEncoder::fit("sentiment", REVIEWS.iter().map(|(_, label)| *label)).unwrap();
    let targets: Vec<usize> = REVIEWS
        .iter()
        .map(|(_, label)| labels.transform(label).unwrap())
        .collect();

    let vectorizer = TfidfVectorizer::fit(&texts, true).unwrap();
    let rows: Vec<Vec<f64>> = texts
        .iter()
        .map(|text| vectorizer.transform(text).to_dense())
        .collect();

    let forward =
        DecisionTree::fit_with_classes(&rows, &targets, labels.len(), &TreeOptions::default())
            .unwrap();
    let reversed_rows: Vec<Vec<f64>> = rows.iter().rev().cloned().collect();
    let reversed_targets: Vec<usize> = targets.iter().rev().copied().collect();
    let backward = DecisionTree::fit_with_classes(
        &reversed_rows,
        &reversed_targets,
        labels.len(),
        &TreeOptions::default(),
    )
    .unwrap();

    let forest = RandomForest::from_trees(vec![forward, backward]).unwrap();
    (vectorizer, Classifier::RandomForest(forest), labels)
}

pub fn sentiment_model() -> SentimentModel {
    let (vectorizer, classifier, labels) = sentiment_parts();
    SentimentModel::new(vectorizer, classifier, labels).unwrap()
}

/// Writes the sentiment artifacts into `dir` and returns a config naming them.
pub async fn write_sentiment_artifacts(dir: &Path) -> SentimentConfig {
    let (vectorizer, classifier, labels) = sentiment_parts();
    let config = SentimentConfig {
        vectorizer_path: dir.join("tfidf_vectorizer.json"),
        classifier_path: dir.join("random_forest_model.json"),
        label_encoder_path: dir.join("label_encoder.json"),
        ..SentimentConfig::default()
    };

    model::save_json(&config.vectorizer_path, &vectorizer).await.unwrap();
    model::save_json(&config.classifier_path, &classifier).await.unwrap();
    model::save_json(&config.label_encoder_path, &labels).await.unwrap();
    config
}

/// Sends a JSON POST and returns the status with the decoded body.
pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
