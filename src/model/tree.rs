use super::{FeatureRow, argmax};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// Two candidate splits closer than this are treated as equally good.
const IMPURITY_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Samples with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class sample counts of the training rows that ended here.
    Leaf { counts: Vec<f64> },
}

/// CART classification tree stored as a flat, pre-ordered node array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    n_features: usize,
    n_classes: usize,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grows a tree with Gini impurity. Features are scanned in column order
    /// and only a strictly better split replaces the current best, so the same
    /// data always yields the same tree.
    pub fn fit(rows: &[Vec<f64>], targets: &[usize], options: &TreeOptions) -> Result<Self> {
        let n_classes = targets.iter().max().map_or(0, |&max| max + 1);
        Self::fit_with_classes(rows, targets, n_classes, options)
    }

    /// Like [`DecisionTree::fit`] but with an explicit class count, so leaves
    /// keep a slot for classes absent from this particular sample.
    pub fn fit_with_classes(
        rows: &[Vec<f64>],
        targets: &[usize],
        n_classes: usize,
        options: &TreeOptions,
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::training("cannot fit a tree on an empty dataset"));
        }
        if rows.len() != targets.len() {
            return Err(Error::training(format!(
                "{} rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }

        let n_features = rows[0].len();
        if n_features == 0 {
            return Err(Error::training("rows have no features"));
        }
        if let Some(pos) = rows.iter().position(|row| row.len() != n_features) {
            return Err(Error::training(format!(
                "row {} has {} features, expected {}",
                pos,
                rows[pos].len(),
                n_features
            )));
        }
        if rows.iter().flatten().any(|value| !value.is_finite()) {
            return Err(Error::training("feature values must be finite"));
        }

        if let Some(&target) = targets.iter().find(|&&t| t >= n_classes) {
            return Err(Error::training(format!(
                "target {} is outside {} classes",
                target, n_classes
            )));
        }

        let mut builder = TreeBuilder {
            rows,
            targets,
            n_features,
            n_classes,
            max_depth: options.max_depth,
            min_samples_split: options.min_samples_split.max(2),
            nodes: Vec::new(),
        };
        builder.grow((0..rows.len()).collect(), 0);

        Ok(Self {
            n_features,
            n_classes,
            nodes: builder.nodes,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes.get(id) {
                Some(Node::Split { left, right, .. }) if *left > id && *right > id => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    pub fn predict_proba<R: FeatureRow + ?Sized>(&self, row: &R) -> Result<Vec<f64>> {
        if row.dimension() != self.n_features {
            return Err(Error::prediction(format!(
                "expected {} features, got {}",
                self.n_features,
                row.dimension()
            )));
        }

        let counts = self.leaf_counts(row)?;
        let total: f64 = counts.iter().sum();
        if total <= 0.0 {
            return Err(Error::prediction("reached a leaf without samples"));
        }
        Ok(counts.iter().map(|count| count / total).collect())
    }

    pub fn predict<R: FeatureRow + ?Sized>(&self, row: &R) -> Result<usize> {
        let proba = self.predict_proba(row)?;
        argmax(&proba).ok_or_else(|| Error::prediction("tree has no classes"))
    }

    fn leaf_counts<R: FeatureRow + ?Sized>(&self, row: &R) -> Result<&[f64]> {
        let mut id = 0;
        // A valid tree never needs more steps than it has nodes
        for _ in 0..self.nodes.len() {
            match self.nodes.get(id) {
                Some(Node::Leaf { counts }) => return Ok(counts),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    id = if row.value(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return Err(Error::prediction(format!("node {} does not exist", id))),
            }
        }
        Err(Error::prediction("tree walk did not reach a leaf"))
    }

    /// Checks structural soundness of a deserialized tree.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::artifact("tree has no nodes"));
        }
        if self.n_classes == 0 {
            return Err(Error::artifact("tree has no classes"));
        }

        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= self.n_features {
                        return Err(Error::artifact(format!(
                            "node {} splits on feature {} of {}",
                            id, feature, self.n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(Error::artifact(format!(
                            "node {} has a non-finite threshold",
                            id
                        )));
                    }
                    // Children always follow their parent in pre-order
                    for child in [left, right] {
                        if *child <= id || *child >= self.nodes.len() {
                            return Err(Error::artifact(format!(
                                "node {} points at invalid child {}",
                                id, child
                            )));
                        }
                    }
                }
                Node::Leaf { counts } => {
                    if counts.len() != self.n_classes {
                        return Err(Error::artifact(format!(
                            "leaf {} has {} class counts, expected {}",
                            id,
                            counts.len(),
                            self.n_classes
                        )));
                    }
                    if counts.iter().any(|c| !c.is_finite() || *c < 0.0)
                        || counts.iter().sum::<f64>() <= 0.0
                    {
                        return Err(Error::artifact(format!("leaf {} has invalid counts", id)));
                    }
                }
            }
        }
        Ok(())
    }
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    targets: &'a [usize],
    n_features: usize,
    n_classes: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&indices);
        let id = self.nodes.len();
        let pure = counts.iter().filter(|&&count| count > 0.0).count() <= 1;
        self.nodes.push(Node::Leaf { counts });

        let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || indices.len() < self.min_samples_split {
            return id;
        }

        let Some(split) = self.best_split(&indices) else {
            return id;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.rows[i][split.feature] <= split.threshold);

        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<f64> {
        let mut counts = vec![0.0; self.n_classes];
        for &i in indices {
            counts[self.targets[i]] += 1.0;
        }
        counts
    }

    fn best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let total = self.class_counts(indices);
        let n = indices.len() as f64;
        let mut best: Option<SplitCandidate> = None;
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(indices.len());

        for feature in 0..self.n_features {
            sorted.clear();
            sorted.extend(
                indices
                    .iter()
                    .map(|&i| (self.rows[i][feature], self.targets[i])),
            );
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = vec![0.0; self.n_classes];
            let mut right = total.clone();

            for pos in 0..sorted.len() - 1 {
                let (value, class) = sorted[pos];
                left[class] += 1.0;
                right[class] -= 1.0;

                let next = sorted[pos + 1].0;
                if next <= value {
                    continue;
                }

                let n_left = (pos + 1) as f64;
                let n_right = n - n_left;
                let impurity =
                    (n_left * gini(&left, n_left) + n_right * gini(&right, n_right)) / n;

                if best
                    .as_ref()
                    .is_none_or(|b| impurity < b.impurity - IMPURITY_EPSILON)
                {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }
}

fn gini(counts: &[f64], n: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / n) * (c / n)).sum::<f64>()
}
