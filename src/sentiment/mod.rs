use crate::{
    Error, Result,
    config::SentimentConfig,
    model::{self, Classifier, LabelEncoder, TfidfVectorizer},
};
use tracing::{debug, info};

/// Fitted sentiment pipeline: text → TF-IDF → classifier → label.
#[derive(Debug, Clone)]
pub struct SentimentModel {
    vectorizer: TfidfVectorizer,
    classifier: Classifier,
    labels: LabelEncoder,
}

impl SentimentModel {
    /// Assembles a model from fitted parts, checking that their shapes agree.
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifier: Classifier,
        labels: LabelEncoder,
    ) -> Result<Self> {
        vectorizer.validate()?;
        classifier.validate()?;
        labels.validate()?;

        if classifier.n_features() != vectorizer.vocabulary_size() {
            return Err(Error::artifact(format!(
                "classifier expects {} features but the vectorizer produces {}",
                classifier.n_features(),
                vectorizer.vocabulary_size()
            )));
        }
        if classifier.n_classes() > labels.len() {
            return Err(Error::artifact(format!(
                "classifier has {} classes but the label encoder knows {}",
                classifier.n_classes(),
                labels.len()
            )));
        }

        Ok(Self {
            vectorizer,
            classifier,
            labels,
        })
    }

    /// Loads the three artifacts named in the config.
    pub async fn load(config: &SentimentConfig) -> Result<Self> {
        let vectorizer: TfidfVectorizer = model::load_json(&config.vectorizer_path).await?;
        let classifier: Classifier = model::load_json(&config.classifier_path).await?;
        let labels: LabelEncoder = model::load_json(&config.label_encoder_path).await?;

        let model = Self::new(vectorizer, classifier, labels)?;
        info!(
            "Sentiment model loaded: {} terms, {} labels",
            model.vectorizer.vocabulary_size(),
            model.labels.len()
        );
        Ok(model)
    }

    pub fn labels(&self) -> &[String] {
        self.labels.classes()
    }

    pub fn predict(&self, text: &str) -> Result<String> {
        let features = self.vectorizer.transform(text);
        debug!("Vectorized text into {} non-zero terms", features.nnz());

        let class = self.classifier.predict(&features)?;
        Ok(self.labels.inverse_transform(class)?.to_string())
    }
}
