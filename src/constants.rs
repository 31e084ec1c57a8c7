//! Fixed scheme and tax parameters. None of these are request-configurable.

/// Annual compounding rate for the NPS scheme.
pub const NPS_RATE: f64 = 0.0711;
/// Annual compounding rate for the index-fund scheme.
pub const INDEX_RATE: f64 = 0.1449;

pub const DEFAULT_INFLATION: f64 = 0.055;
pub const RETIREMENT_AGE: i64 = 60;
pub const MIN_INVESTMENT_YEARS: i64 = 5;

pub const MAX_NPS_DEDUCTION: f64 = 200_000.0;
pub const NPS_DEDUCTION_INCOME_PCT: f64 = 0.10;

/// Expense amounts must lie in [0, MAX_AMOUNT).
pub const MAX_AMOUNT: f64 = 500_000.0;
/// Ceilings round an amount up to the next multiple of this.
pub const ROUNDING_UNIT: f64 = 100.0;

pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Progressive slabs as (upper bound, marginal rate), ascending, with an
/// unbounded top slab.
pub const TAX_SLABS: [(f64, f64); 5] = [
    (700_000.0, 0.00),
    (1_000_000.0, 0.10),
    (1_200_000.0, 0.15),
    (1_500_000.0, 0.20),
    (f64::INFINITY, 0.30),
];
