use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_INFLATION;

/// Round to currency precision (2 decimals).
pub fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

/// A raw expense as submitted for parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct Expense {
    pub timestamp: String,
    pub amount: f64,
}

/// A parsed transaction: the expense plus its round-up. `remanent` is the
/// investable residue and is the only field the rule pipeline rewrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "crate::datetime::serde_fmt")]
    pub date: NaiveDateTime,
    pub amount: f64,
    pub ceiling: f64,
    pub remanent: f64,
}

/// Validator input. `date` stays a string here: one malformed date must be
/// reported against its own record, not abort deserialization of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remanent: Option<f64>,
}

/// Override rule (q): replaces the remanent with `fixed` inside [start, end].
#[derive(Debug, Clone, Deserialize)]
pub struct OverridePeriod {
    #[serde(with = "crate::datetime::serde_fmt")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::datetime::serde_fmt")]
    pub end: NaiveDateTime,
    pub fixed: f64,
}

/// Overlay rule (p): adds `extra` to the remanent inside [start, end].
/// Overlapping overlays stack.
#[derive(Debug, Clone, Deserialize)]
pub struct OverlayPeriod {
    #[serde(with = "crate::datetime::serde_fmt")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::datetime::serde_fmt")]
    pub end: NaiveDateTime,
    pub extra: f64,
}

/// Reporting window (k). Windows are independent and may overlap.
#[derive(Debug, Clone, Deserialize)]
pub struct Window {
    #[serde(with = "crate::datetime::serde_fmt")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::datetime::serde_fmt")]
    pub end: NaiveDateTime,
}

/// Sum of remanents of the transactions falling in one window.
#[derive(Debug, Clone, Serialize)]
pub struct SavingsBucket {
    #[serde(with = "crate::datetime::serde_fmt")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::datetime::serde_fmt")]
    pub end: NaiveDateTime,
    pub amount: f64,
}

/// A savings bucket projected to retirement. The wire spells the profit key
/// `profits`.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnBucket {
    #[serde(with = "crate::datetime::serde_fmt")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::datetime::serde_fmt")]
    pub end: NaiveDateTime,
    pub amount: f64,
    #[serde(rename = "profits")]
    pub profit: f64,
    #[serde(rename = "taxBenefit")]
    pub tax_benefit: f64,
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub q: Vec<OverridePeriod>,
    #[serde(default)]
    pub p: Vec<OverlayPeriod>,
    #[serde(default)]
    pub k: Vec<Window>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnsRequest {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub q: Vec<OverridePeriod>,
    #[serde(default)]
    pub p: Vec<OverlayPeriod>,
    #[serde(default)]
    pub k: Vec<Window>,
    #[serde(default = "default_age")]
    pub age: i64,
    #[serde(default)]
    pub wage: f64,
    #[serde(default = "default_inflation")]
    pub inflation: f64,
}

fn default_age() -> i64 {
    30
}

fn default_inflation() -> f64 {
    DEFAULT_INFLATION
}

/// A transaction rejected by the validity filter, echoed back with a reason.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub message: String,
}

/// A raw record rejected by the validator, echoed back with joined reasons.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRecord {
    #[serde(flatten)]
    pub record: RawTransaction,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub valid: Vec<Transaction>,
    pub invalid: Vec<RejectedTransaction>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: Vec<RawTransaction>,
    pub invalid: Vec<RejectedRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsResponse {
    pub transactions_total_amount: f64,
    pub transactions_total_ceiling: f64,
    pub savings_by_dates: Vec<ReturnBucket>,
}
