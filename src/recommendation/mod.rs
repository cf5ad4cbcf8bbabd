mod dataset;
mod request;

pub use dataset::{CustomerRecord, load_dataset, read_dataset};
pub use request::{RecommendationRequest, loan_flag};

use crate::{
    Result,
    config::RecommendationConfig,
    model::{DecisionTree, LabelEncoder, TreeOptions},
};
use serde_json::Value;
use tracing::{debug, info};

/// Feature order shared by training rows and request vectors.
pub const FEATURE_COLUMNS: [&str; 7] = [
    "Usia",
    "Jenis_Kelamin",
    "Pendapatan_Bulanan",
    "Saldo_Rekening",
    "Riwayat_Pinjaman",
    "Jenis_Transaksi_Favorit",
    "Frekuensi_Transaksi",
];

pub const TARGET_COLUMN: &str = "Produk_Direkomendasikan";

/// Decision tree plus the encoders fitted on the same table.
#[derive(Debug, Clone)]
pub struct RecommendationModel {
    tree: DecisionTree,
    gender: LabelEncoder,
    transaction: LabelEncoder,
    product: LabelEncoder,
}

impl RecommendationModel {
    /// Fits the categorical encoders and trains the tree on `records`.
    pub fn train(records: &[CustomerRecord], options: &TreeOptions) -> Result<Self> {
        let gender = LabelEncoder::fit(
            "gender",
            records.iter().map(|r| r.jenis_kelamin.as_str()),
        )?;
        let transaction = LabelEncoder::fit(
            "transaction type",
            records.iter().map(|r| r.jenis_transaksi_favorit.as_str()),
        )?;
        let product = LabelEncoder::fit("product", records.iter().map(|r| r.produk.as_str()))?;

        let mut rows = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());
        for record in records {
            rows.push(vec![
                record.usia,
                gender.transform(&record.jenis_kelamin)? as f64,
                record.pendapatan,
                record.saldo,
                record.riwayat_pinjaman,
                transaction.transform(&record.jenis_transaksi_favorit)? as f64,
                record.frekuensi_transaksi,
            ]);
            targets.push(product.transform(&record.produk)?);
        }

        let tree = DecisionTree::fit_with_classes(&rows, &targets, product.len(), options)?;
        debug!(
            "Trained decision tree on {:?} -> {}: depth {}, {} leaves",
            FEATURE_COLUMNS,
            TARGET_COLUMN,
            tree.depth(),
            tree.n_leaves()
        );

        Ok(Self {
            tree,
            gender,
            transaction,
            product,
        })
    }

    /// Reads the dataset named in the config and trains on it.
    pub fn load(config: &RecommendationConfig) -> Result<Self> {
        let records = load_dataset(&config.dataset_path)?;
        let options = TreeOptions {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
        };

        let model = Self::train(&records, &options)?;
        info!(
            "Recommendation model trained on {} rows: {} products, {} genders, {} transaction types",
            records.len(),
            model.product.len(),
            model.gender.len(),
            model.transaction.len()
        );
        Ok(model)
    }

    pub fn products(&self) -> &[String] {
        self.product.classes()
    }

    /// Builds the feature vector in [`FEATURE_COLUMNS`] order.
    pub fn encode(&self, request: &RecommendationRequest) -> Result<Vec<f64>> {
        Ok(vec![
            request.usia as f64,
            self.gender.transform(&request.jenis_kelamin)? as f64,
            request.pendapatan as f64,
            request.saldo as f64,
            request.loan_flag() as f64,
            self.transaction.transform(&request.jenis_transaksi_favorit)? as f64,
            request.frekuensi_transaksi as f64,
        ])
    }

    pub fn predict(&self, request: &RecommendationRequest) -> Result<String> {
        let features = self.encode(request)?;
        let class = self.tree.predict(&features)?;
        Ok(self.product.inverse_transform(class)?.to_string())
    }

    /// Parses a raw JSON body and predicts in one step.
    pub fn predict_json(&self, body: &Value) -> Result<String> {
        let request = RecommendationRequest::from_json(body)?;
        self.predict(&request)
    }
}
