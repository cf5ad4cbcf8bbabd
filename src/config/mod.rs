mod types;

pub use types::*;

use crate::Result;
use std::{env, io::ErrorKind, path::Path};
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    load_from(&config_path).await
}

pub async fn load_from(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from: {}", config_path.display());

    let config_str = match tokio::fs::read_to_string(config_path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(
                "Configuration file {} not found, using defaults",
                config_path.display()
            );
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };

    // An empty document deserializes to unit, not to an empty mapping
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml::from_str(&config_str)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from(temp_dir.path().join("absent.yaml")).await.unwrap();

        assert_eq!(config.logs.level, "info");
        assert_eq!(config.sentiment.port, 8000);
        assert_eq!(config.recommendation.port, 5000);
        assert_eq!(config.recommendation.min_samples_split, 2);
        assert!(config.recommendation.max_depth.is_none());
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        tokio::fs::write(
            &path,
            "logs:\n  level: debug\nrecommendation:\n  port: 5050\n  max_depth: 4\n",
        )
        .await
        .unwrap();

        let config = load_from(&path).await.unwrap();
        assert_eq!(config.logs.level, "debug");
        assert_eq!(config.recommendation.port, 5050);
        assert_eq!(config.recommendation.max_depth, Some(4));
        assert_eq!(config.recommendation.host, "0.0.0.0");
        assert_eq!(
            config.sentiment.vectorizer_path,
            std::path::PathBuf::from("artifacts/tfidf_vectorizer.json")
        );
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        tokio::fs::write(&path, "sentiment:\n  port: not-a-port\n")
            .await
            .unwrap();

        assert!(matches!(load_from(&path).await, Err(crate::Error::Yaml(_))));
    }
}
