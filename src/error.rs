use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Unknown {category} category: {value}")]
    UnknownCategory { category: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }

    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn unknown_category(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownCategory {
            category: category.into(),
            value: value.into(),
        }
    }

    /// True for failures caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::InvalidValue { .. } | Self::UnknownCategory { .. }
        )
    }
}
