use crate::constants::{MAX_NPS_DEDUCTION, NPS_DEDUCTION_INCOME_PCT, TAX_SLABS};
use crate::models::round2;

/// Progressive slab tax on an annual income. Each slab taxes the portion of
/// income between the previous bound and its own; income at or below the
/// first bound owes nothing.
pub fn slab_tax(income: f64) -> f64 {
    if income <= TAX_SLABS[0].0 {
        return 0.0;
    }

    let mut tax = 0.0;
    let mut prev_limit = 0.0;
    for &(limit, rate) in TAX_SLABS.iter() {
        if income <= limit {
            tax += (income - prev_limit) * rate;
            break;
        }
        tax += (limit - prev_limit) * rate;
        prev_limit = limit;
    }
    round2(tax)
}

/// NPS benefit is the tax no longer owed once the deductible part of the
/// invested amount comes off the income:
/// `deduction = min(invested, 10% of income, 200_000)`.
pub fn nps_tax_benefit(invested: f64, annual_income: f64) -> f64 {
    let deduction = invested
        .min(NPS_DEDUCTION_INCOME_PCT * annual_income)
        .min(MAX_NPS_DEDUCTION);
    round2(slab_tax(annual_income) - slab_tax(annual_income - deduction))
}
