use super::SparseVector;
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::LazyLock,
};

// Runs of two or more word characters
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern compiles"));

/// TF-IDF text vectorizer with a fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
}

fn default_lowercase() -> bool {
    true
}

impl TfidfVectorizer {
    /// Learns the vocabulary and smoothed inverse document frequencies.
    pub fn fit<S: AsRef<str>>(documents: &[S], lowercase: bool) -> Result<Self> {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let unique: BTreeSet<String> = tokenize(document.as_ref(), lowercase).collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(Error::training(
                "vectorizer corpus contains no tokens".to_string(),
            ));
        }

        let n_documents = documents.len() as f64;
        let sorted: BTreeMap<String, usize> = document_frequency.into_iter().collect();

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(sorted.len());
        for (column, (token, df)) in sorted.into_iter().enumerate() {
            idf.push(((1.0 + n_documents) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(token, column);
        }

        Ok(Self {
            vocabulary,
            idf,
            lowercase,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn column(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }

    /// Turns text into an L2-normalised TF-IDF row. Unknown tokens are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text, self.lowercase) {
            if let Some(&column) = self.vocabulary.get(&token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .collect();

        let norm = entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for entry in &mut entries {
                entry.1 /= norm;
            }
        }

        SparseVector::new(self.idf.len(), entries)
    }

    pub fn validate(&self) -> Result<()> {
        if self.idf.is_empty() {
            return Err(Error::artifact("vectorizer has an empty vocabulary"));
        }
        if self.vocabulary.len() != self.idf.len() {
            return Err(Error::artifact(format!(
                "vectorizer has {} vocabulary entries but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }

        let mut columns = vec![false; self.idf.len()];
        for (token, &column) in &self.vocabulary {
            match columns.get_mut(column) {
                Some(taken) if !*taken => *taken = true,
                Some(_) => {
                    return Err(Error::artifact(format!(
                        "vectorizer column {} is assigned twice (token '{}')",
                        column, token
                    )));
                }
                None => {
                    return Err(Error::artifact(format!(
                        "vectorizer token '{}' maps to column {} beyond {} columns",
                        token,
                        column,
                        self.idf.len()
                    )));
                }
            }
        }

        if let Some(weight) = self.idf.iter().find(|w| !w.is_finite()) {
            return Err(Error::artifact(format!(
                "vectorizer has a non-finite idf weight: {}",
                weight
            )));
        }
        Ok(())
    }
}

fn tokenize(text: &str, lowercase: bool) -> impl Iterator<Item = String> {
    let text = if lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    TOKEN_PATTERN
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect::<Vec<_>>()
        .into_iter()
}
