//! Fitted model artifacts shared by both prediction services.
//!
//! Everything here is immutable once fitted or loaded. Artifacts are stored as
//! JSON documents and validated on load so a malformed file fails at startup
//! rather than on the first request.

mod features;
mod forest;
mod label_encoder;
mod tfidf;
mod tree;

pub use features::{FeatureRow, SparseVector};
pub use forest::RandomForest;
pub use label_encoder::LabelEncoder;
pub use tfidf::TfidfVectorizer;
pub use tree::{DecisionTree, Node, TreeOptions};

use crate::{Error, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::Path;
use tracing::debug;

/// A fitted classifier as stored in an artifact file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classifier {
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl Classifier {
    pub fn n_features(&self) -> usize {
        match self {
            Self::DecisionTree(tree) => tree.n_features(),
            Self::RandomForest(forest) => forest.n_features(),
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            Self::DecisionTree(tree) => tree.n_classes(),
            Self::RandomForest(forest) => forest.n_classes(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::DecisionTree(tree) => tree.validate(),
            Self::RandomForest(forest) => forest.validate(),
        }
    }

    pub fn predict<R: FeatureRow + ?Sized>(&self, row: &R) -> Result<usize> {
        match self {
            Self::DecisionTree(tree) => tree.predict(row),
            Self::RandomForest(forest) => forest.predict(row),
        }
    }
}

/// Index of the largest value; the first one wins on ties.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Reads and deserializes a JSON artifact.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Loading artifact from: {}", path.display());

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::artifact(format!("failed to read {}: {}", path.display(), e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::artifact(format!("failed to parse {}: {}", path.display(), e)))
}

/// Serializes an artifact to a JSON file.
pub async fn save_json<T: Serialize>(path: &Path, artifact: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(artifact)?;
    tokio::fs::write(path, bytes).await?;
    debug!("Saved artifact to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[1.0]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[tokio::test]
    async fn test_classifier_artifact_is_tagged() {
        let tree = DecisionTree::fit(
            &[vec![0.0], vec![1.0]],
            &[0, 1],
            &TreeOptions::default(),
        )
        .unwrap();
        let classifier = Classifier::DecisionTree(tree);

        let json = serde_json::to_value(&classifier).unwrap();
        assert_eq!(json["type"], "decision_tree");

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        save_json(&path, &classifier).await.unwrap();

        let loaded: Classifier = load_json(&path).await.unwrap();
        loaded.validate().unwrap();
        assert_eq!(loaded.predict(&[0.9][..]).unwrap(), 1);
        assert_eq!(loaded.n_classes(), 2);
        assert_eq!(loaded.n_features(), 1);
    }

    #[tokio::test]
    async fn test_load_json_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        let err = load_json::<LabelEncoder>(&path).await.unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
        assert!(err.to_string().contains("missing.json"));
    }
}
