use std::collections::HashSet;

use crate::constants::{MAX_AMOUNT, ROUNDING_UNIT};
use crate::datetime::parse_instant;
use crate::error::Result;
use crate::models::{round2, Expense, RawTransaction, RejectedRecord, Transaction};

/// Round an amount up to the next multiple of the rounding unit.
pub fn compute_ceiling(amount: f64) -> f64 {
    (amount / ROUNDING_UNIT).ceil() * ROUNDING_UNIT
}

/// Derive transactions from raw expenses. A malformed timestamp aborts the
/// batch: every downstream stage needs the date.
pub fn parse_expenses(expenses: &[Expense]) -> Result<Vec<Transaction>> {
    expenses
        .iter()
        .map(|exp| {
            let ceiling = compute_ceiling(exp.amount);
            Ok(Transaction {
                date: parse_instant(&exp.timestamp)?,
                amount: round2(exp.amount),
                ceiling: round2(ceiling),
                remanent: round2(ceiling - exp.amount),
            })
        })
        .collect()
}

pub struct ValidationOutcome {
    pub valid: Vec<RawTransaction>,
    pub invalid: Vec<RejectedRecord>,
}

/// Per-record validation: the date must parse, the amount must sit in
/// [0, MAX_AMOUNT), ceiling and remanent must match their recomputed values,
/// and dates must be unique. Problems are collected per record; one bad
/// record never sinks the batch. On a duplicate date only the later
/// occurrences are flagged.
pub fn validate_transactions(records: Vec<RawTransaction>) -> ValidationOutcome {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    let mut seen_dates: HashSet<String> = HashSet::new();

    for record in records {
        let mut errors: Vec<String> = Vec::new();

        if parse_instant(&record.date).is_err() {
            errors.push(format!("Invalid date format: {}", record.date));
        }

        match record.amount {
            None => errors.push("Amount must be a number".to_string()),
            Some(amount) if !(0.0..MAX_AMOUNT).contains(&amount) => {
                errors.push(format!("Amount {amount} out of range [0, {MAX_AMOUNT})"));
            }
            _ => {}
        }

        if errors.is_empty() {
            let amount = record.amount.unwrap_or(0.0);
            let expected_ceiling = compute_ceiling(amount);
            let expected_remanent = expected_ceiling - amount;

            match record.ceiling {
                Some(c) if round2(c) == round2(expected_ceiling) => {}
                got => errors.push(format!(
                    "Ceiling mismatch: expected {expected_ceiling}, got {}",
                    fmt_opt(got)
                )),
            }
            match record.remanent {
                Some(r) if round2(r) == round2(expected_remanent) => {}
                got => errors.push(format!(
                    "Remanent mismatch: expected {expected_remanent}, got {}",
                    fmt_opt(got)
                )),
            }
        }

        if !seen_dates.insert(record.date.clone()) {
            errors.push(format!("Duplicate date: {}", record.date));
        }

        if errors.is_empty() {
            valid.push(record);
        } else {
            invalid.push(RejectedRecord {
                record,
                message: errors.join("; "),
            });
        }
    }

    ValidationOutcome { valid, invalid }
}

fn fmt_opt(val: Option<f64>) -> String {
    match val {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}
