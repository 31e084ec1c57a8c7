use clap::ValueEnum;

use crate::constants::{INDEX_RATE, MIN_INVESTMENT_YEARS, NPS_RATE, RETIREMENT_AGE};
use crate::models::{
    round2, OverlayPeriod, OverridePeriod, ReturnBucket, ReturnsResponse, Transaction, Window,
};
use crate::rules::{apply_overlays, apply_overrides, group_into_windows};
use crate::tax::nps_tax_benefit;

/// The two investment schemes differ only in compounding rate and whether the
/// invested amount earns a tax deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scheme {
    /// National Pension System: lower rate, tax-advantaged.
    Nps,
    /// Index fund: higher rate, no tax treatment.
    Index,
}

impl Scheme {
    pub fn rate(self) -> f64 {
        match self {
            Scheme::Nps => NPS_RATE,
            Scheme::Index => INDEX_RATE,
        }
    }

    pub fn tax_advantaged(self) -> bool {
        matches!(self, Scheme::Nps)
    }
}

/// Years the savings stay invested: until retirement, floored at the minimum
/// horizon for investors at or past retirement age.
fn investment_years(age: i64) -> i64 {
    (RETIREMENT_AGE - age).max(MIN_INVESTMENT_YEARS)
}

fn compound(principal: f64, rate: f64, years: i64) -> f64 {
    principal * (1.0 + rate).powi(years as i32)
}

fn inflation_adjust(amount: f64, inflation: f64, years: i64) -> f64 {
    amount / (1.0 + inflation).powi(years as i32)
}

/// Full returns pipeline: q and p rule passes, window grouping, then each
/// bucket compounded to retirement, deflated back to today's money, and (for
/// tax-advantaged schemes) credited with the deduction benefit.
pub fn calculate_returns(
    txns: Vec<Transaction>,
    q: &[OverridePeriod],
    p: &[OverlayPeriod],
    k: &[Window],
    age: i64,
    wage: f64,
    inflation: f64,
    scheme: Scheme,
) -> ReturnsResponse {
    let adjusted = apply_overlays(apply_overrides(txns, q), p);

    let total_amount = round2(adjusted.iter().map(|t| t.amount).sum());
    let total_ceiling = round2(adjusted.iter().map(|t| t.ceiling).sum());

    let buckets = group_into_windows(&adjusted, k);

    let years = investment_years(age);
    let annual_income = wage * 12.0;

    let savings_by_dates = buckets
        .into_iter()
        .map(|bucket| {
            let invested = bucket.amount;
            let future_value = compound(invested, scheme.rate(), years);
            let real_value = inflation_adjust(future_value, inflation, years);

            let tax_benefit = if scheme.tax_advantaged() {
                nps_tax_benefit(invested, annual_income)
            } else {
                0.0
            };

            ReturnBucket {
                start: bucket.start,
                end: bucket.end,
                amount: round2(invested),
                profit: round2(real_value - invested),
                tax_benefit,
            }
        })
        .collect();

    ReturnsResponse {
        transactions_total_amount: total_amount,
        transactions_total_ceiling: total_ceiling,
        savings_by_dates,
    }
}
