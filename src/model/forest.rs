use super::{DecisionTree, FeatureRow, argmax};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Ensemble of decision trees voting by averaged class probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn from_trees(trees: Vec<DecisionTree>) -> Result<Self> {
        let first = trees
            .first()
            .ok_or_else(|| Error::training("a forest needs at least one tree"))?;

        let forest = Self {
            n_features: first.n_features(),
            n_classes: first.n_classes(),
            trees,
        };
        forest.check_members().map_err(|e| Error::training(e.to_string()))?;
        Ok(forest)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn predict_proba<R: FeatureRow + ?Sized>(&self, row: &R) -> Result<Vec<f64>> {
        let mut total = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (sum, p) in total.iter_mut().zip(tree.predict_proba(row)?) {
                *sum += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(total.into_iter().map(|sum| sum / n_trees).collect())
    }

    pub fn predict<R: FeatureRow + ?Sized>(&self, row: &R) -> Result<usize> {
        let proba = self.predict_proba(row)?;
        argmax(&proba).ok_or_else(|| Error::prediction("forest has no classes"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(Error::artifact("forest has no trees"));
        }
        self.check_members()?;
        for tree in &self.trees {
            tree.validate()?;
        }
        Ok(())
    }

    fn check_members(&self) -> Result<()> {
        for (idx, tree) in self.trees.iter().enumerate() {
            if tree.n_features() != self.n_features || tree.n_classes() != self.n_classes {
                return Err(Error::artifact(format!(
                    "tree {} has shape {}x{}, forest expects {}x{}",
                    idx,
                    tree.n_features(),
                    tree.n_classes(),
                    self.n_features,
                    self.n_classes
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeOptions;
    use pretty_assertions::assert_eq;

    fn stump(rows: &[Vec<f64>], targets: &[usize]) -> DecisionTree {
        DecisionTree::fit_with_classes(rows, targets, 2, &TreeOptions::default()).unwrap()
    }

    #[test]
    fn test_averages_member_probabilities() {
        // Two trees say class 1 for x > 0.5, one says class 0 everywhere
        let split = stump(&[vec![0.0], vec![1.0]], &[0, 1]);
        let constant = stump(&[vec![0.0], vec![1.0]], &[0, 0]);
        let forest = RandomForest::from_trees(vec![split.clone(), split, constant]).unwrap();
        forest.validate().unwrap();

        let proba = forest.predict_proba(&[1.0][..]).unwrap();
        assert!((proba[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((proba[1] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(forest.predict(&[1.0][..]).unwrap(), 1);
        assert_eq!(forest.predict(&[0.0][..]).unwrap(), 0);
        assert_eq!(forest.n_trees(), 3);
    }

    #[test]
    fn test_rejects_mismatched_trees() {
        let narrow = stump(&[vec![0.0], vec![1.0]], &[0, 1]);
        let wide = DecisionTree::fit(
            &[vec![0.0, 0.0], vec![1.0, 1.0]],
            &[0, 1],
            &TreeOptions::default(),
        )
        .unwrap();

        assert!(RandomForest::from_trees(vec![narrow, wide]).is_err());
        assert!(RandomForest::from_trees(Vec::new()).is_err());
    }

    #[test]
    fn test_validate_empty_forest_from_json() {
        let json = r#"{"n_features": 1, "n_classes": 2, "trees": []}"#;
        let forest: RandomForest = serde_json::from_str(json).unwrap();
        assert!(matches!(forest.validate(), Err(Error::Artifact(_))));
    }
}
