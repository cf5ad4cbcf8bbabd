//! Loader for the financial-transaction training table.
//!
//! The CSV has a header row; only the columns below are read and any others
//! are ignored.

use super::request::loan_flag;
use crate::{Error, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::{io::Read, path::Path};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Usia")]
    usia: f64,
    #[serde(rename = "Jenis_Kelamin")]
    jenis_kelamin: String,
    #[serde(rename = "Pendapatan_Bulanan")]
    pendapatan: f64,
    #[serde(rename = "Saldo_Rekening")]
    saldo: f64,
    #[serde(rename = "Riwayat_Pinjaman")]
    riwayat_pinjaman: String,
    #[serde(rename = "Jenis_Transaksi_Favorit")]
    jenis_transaksi_favorit: String,
    #[serde(rename = "Frekuensi_Transaksi")]
    frekuensi_transaksi: f64,
    #[serde(rename = "Produk_Direkomendasikan")]
    produk: String,
}

/// One customer row of the training table.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub usia: f64,
    pub jenis_kelamin: String,
    pub pendapatan: f64,
    pub saldo: f64,
    /// 1.0 when the customer has taken a loan before.
    pub riwayat_pinjaman: f64,
    pub jenis_transaksi_favorit: String,
    pub frekuensi_transaksi: f64,
    pub produk: String,
}

impl From<RawRecord> for CustomerRecord {
    fn from(raw: RawRecord) -> Self {
        // Numeric in the published dataset; text values follow the request rule
        let riwayat_pinjaman = raw
            .riwayat_pinjaman
            .parse::<f64>()
            .unwrap_or_else(|_| loan_flag(&raw.riwayat_pinjaman) as f64);

        Self {
            usia: raw.usia,
            jenis_kelamin: raw.jenis_kelamin,
            pendapatan: raw.pendapatan,
            saldo: raw.saldo,
            riwayat_pinjaman,
            jenis_transaksi_favorit: raw.jenis_transaksi_favorit,
            frekuensi_transaksi: raw.frekuensi_transaksi,
            produk: raw.produk,
        }
    }
}

pub fn load_dataset(path: &Path) -> Result<Vec<CustomerRecord>> {
    debug!("Loading dataset from: {}", path.display());

    let file = std::fs::File::open(path)
        .map_err(|e| Error::dataset(format!("failed to open {}: {}", path.display(), e)))?;

    read_dataset(file)
        .map_err(|e| Error::dataset(format!("{}: {}", path.display(), strip_prefix(&e))))
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Vec<CustomerRecord>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<RawRecord>().enumerate() {
        // Row numbers count the header as line 1
        let raw = row.map_err(|e| Error::dataset(format!("row {}: {}", idx + 2, e)))?;
        records.push(CustomerRecord::from(raw));
    }

    if records.is_empty() {
        return Err(Error::dataset("dataset has no rows"));
    }

    debug!("Read {} dataset rows", records.len());
    Ok(records)
}

fn strip_prefix(error: &Error) -> String {
    match error {
        Error::Dataset(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const HEADER: &str = "Usia,Jenis_Kelamin,Pendapatan_Bulanan,Saldo_Rekening,Riwayat_Pinjaman,Jenis_Transaksi_Favorit,Frekuensi_Transaksi,Produk_Direkomendasikan";

    #[test]
    fn test_reads_rows_and_trims() {
        let csv = format!(
            "{}\n 22 , Laki-laki ,3000000,1500000,0,Transfer,12,Tabungan\n41,Perempuan,15000000,90000000,1,Investasi,4,Deposito\n",
            HEADER
        );
        let records = read_dataset(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].usia, 22.0);
        assert_eq!(records[0].jenis_kelamin, "Laki-laki");
        assert_eq!(records[0].riwayat_pinjaman, 0.0);
        assert_eq!(records[1].riwayat_pinjaman, 1.0);
        assert_eq!(records[1].produk, "Deposito");
    }

    #[test]
    fn test_ignores_extra_columns() {
        let csv = "ID,Usia,Jenis_Kelamin,Pendapatan_Bulanan,Saldo_Rekening,Riwayat_Pinjaman,Jenis_Transaksi_Favorit,Frekuensi_Transaksi,Produk_Direkomendasikan\n\
                   7,30,Perempuan,5000000,4000000,0,Transfer,6,Tabungan\n";
        let records = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(records[0].usia, 30.0);
    }

    #[test]
    fn test_textual_loan_history() {
        let csv = format!(
            "{}\n30,Perempuan,5000000,4000000,Pernah,Transfer,6,Kredit\n31,Perempuan,5000000,4000000,Tidak,Transfer,6,Tabungan\n",
            HEADER
        );
        let records = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(records[0].riwayat_pinjaman, 1.0);
        assert_eq!(records[1].riwayat_pinjaman, 0.0);
    }

    #[test]
    fn test_bad_number_names_row() {
        let csv = format!(
            "{}\n30,Perempuan,5000000,4000000,0,Transfer,6,Tabungan\nabc,Perempuan,5000000,4000000,0,Transfer,6,Tabungan\n",
            HEADER
        );
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "Usia,Jenis_Kelamin\n30,Perempuan\n";
        assert!(matches!(read_dataset(csv.as_bytes()), Err(Error::Dataset(_))));
    }

    #[test]
    fn test_header_only_fails() {
        assert!(read_dataset(HEADER.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_dataset(&temp_dir.path().join("nope.csv")).unwrap_err();
        assert!(err.to_string().contains("nope.csv"));
    }
}
