use crate::{Error, Result};
use serde_json::{Map, Value};

pub const USIA: &str = "usia";
pub const JENIS_KELAMIN: &str = "jenisKelamin";
pub const PENDAPATAN: &str = "pendapatan";
pub const SALDO: &str = "saldo";
pub const RIWAYAT_PINJAMAN: &str = "riwayatPinjaman";
pub const JENIS_TRANSAKSI_FAVORIT: &str = "jenisTransaksiFavorit";
pub const FREKUENSI_TRANSAKSI: &str = "frekuensiTransaksi";

/// Validated body of a recommendation request.
///
/// The front-end sends every field as a string; numeric fields are parsed
/// here so that the model only ever sees well-typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub usia: i64,
    pub jenis_kelamin: String,
    pub pendapatan: i64,
    pub saldo: i64,
    pub riwayat_pinjaman: String,
    pub jenis_transaksi_favorit: String,
    pub frekuensi_transaksi: i64,
}

impl RecommendationRequest {
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| Error::invalid_value("body", body.to_string()))?;

        Ok(Self {
            usia: integer_field(object, USIA)?,
            jenis_kelamin: text_field(object, JENIS_KELAMIN)?,
            pendapatan: integer_field(object, PENDAPATAN)?,
            saldo: integer_field(object, SALDO)?,
            riwayat_pinjaman: text_field(object, RIWAYAT_PINJAMAN)?,
            jenis_transaksi_favorit: text_field(object, JENIS_TRANSAKSI_FAVORIT)?,
            frekuensi_transaksi: integer_field(object, FREKUENSI_TRANSAKSI)?,
        })
    }

    /// Loan history as the binary feature the model was trained on.
    pub fn loan_flag(&self) -> i64 {
        loan_flag(&self.riwayat_pinjaman)
    }
}

/// 1 for "pernah" ("has had a loan") in any letter case, otherwise 0.
pub fn loan_flag(value: &str) -> i64 {
    if value.to_lowercase() == "pernah" { 1 } else { 0 }
}

fn integer_field(object: &Map<String, Value>, field: &str) -> Result<i64> {
    match object.get(field) {
        None => Err(Error::missing_field(field)),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::invalid_value(field, text.as_str())),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
                    .map(|v| v as i64)
            })
            .ok_or_else(|| Error::invalid_value(field, number.to_string())),
        Some(other) => Err(Error::invalid_value(field, other.to_string())),
    }
}

fn text_field(object: &Map<String, Value>, field: &str) -> Result<String> {
    match object.get(field) {
        None => Err(Error::missing_field(field)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(Error::invalid_value(field, other.to_string())),
    }
}
