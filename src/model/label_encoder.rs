use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Bidirectional mapping between category strings and class indices.
///
/// Classes are kept in sorted order after `fit`, so the index of a category
/// is stable for a given vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    #[serde(default = "default_name")]
    name: String,
    classes: Vec<String>,
}

fn default_name() -> String {
    "label".to_string()
}

impl LabelEncoder {
    pub fn fit<I, S>(name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect();

        if classes.is_empty() {
            return Err(Error::training(format!(
                "cannot fit {} encoder on an empty column",
                name
            )));
        }

        Ok(Self {
            name,
            classes: classes.into_iter().collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn transform(&self, value: &str) -> Result<usize> {
        self.classes
            .iter()
            .position(|class| class == value)
            .ok_or_else(|| Error::unknown_category(&self.name, value))
    }

    pub fn inverse_transform(&self, index: usize) -> Result<&str> {
        self.classes.get(index).map(String::as_str).ok_or_else(|| {
            Error::prediction(format!(
                "class index {} is outside the {} encoder ({} classes)",
                index,
                self.name,
                self.classes.len()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(Error::artifact(format!("{} encoder has no classes", self.name)));
        }

        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class) {
                return Err(Error::artifact(format!(
                    "{} encoder lists class '{}' twice",
                    self.name, class
                )));
            }
        }
        Ok(())
    }
}
