use serde::{Deserialize, Serialize};

/// Read access to one sample's feature values.
pub trait FeatureRow {
    /// Number of feature columns.
    fn dimension(&self) -> usize;

    /// Value of column `index`; absent sparse entries read as zero.
    fn value(&self, index: usize) -> f64;
}

impl FeatureRow for [f64] {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn value(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(0.0)
    }
}

impl FeatureRow for Vec<f64> {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn value(&self, index: usize) -> f64 {
        self.as_slice().value(index)
    }
}

/// Sparse row with entries sorted by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Builds a row from unsorted entries; later duplicates overwrite earlier ones.
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(column, _)| column);
        entries.dedup_by(|later, earlier| {
            if later.0 == earlier.0 {
                earlier.1 = later.1;
                true
            } else {
                false
            }
        });
        entries.retain(|&(column, _)| column < dimension);
        Self { dimension, entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for &(column, value) in &self.entries {
            dense[column] = value;
        }
        dense
    }
}

impl FeatureRow for SparseVector {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn value(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(column, _)| column)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }
}
