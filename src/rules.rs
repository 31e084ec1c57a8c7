//! The temporal rule engine: override (q) and overlay (p) rules rewrite
//! transaction remanents, window (k) rules group them into savings buckets.
//!
//! Both rule passes are single sweeps over a merged event timeline instead of
//! a scan of every period per transaction, so a request costs
//! O((n + m) log(n + m)) rather than O(n * m).

use std::cmp::Reverse;
use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::models::{
    round2, OverlayPeriod, OverridePeriod, RejectedTransaction, SavingsBucket, Transaction, Window,
};

pub const OUTSIDE_WINDOWS_MSG: &str = "Transaction date outside all k periods";

// Event kinds in sort order at equal instants: a period opening exactly at a
// transaction's timestamp is already active, and one closing exactly at it is
// still active (intervals are closed on both ends).
const EV_OPEN: u8 = 0;
const EV_TXN: u8 = 1;
const EV_CLOSE: u8 = 2;

// ---------------------------------------------------------------------------
// Override rules (q)
// ---------------------------------------------------------------------------

/// Replace each transaction's remanent with the `fixed` value of the matching
/// override period, if any. When several periods contain a date, the one with
/// the latest start wins; ties go to the earliest declared.
pub fn apply_overrides(mut txns: Vec<Transaction>, periods: &[OverridePeriod]) -> Vec<Transaction> {
    if periods.is_empty() {
        return txns;
    }

    let mut events: Vec<(NaiveDateTime, u8, usize)> =
        Vec::with_capacity(txns.len() + 2 * periods.len());
    for (qi, qp) in periods.iter().enumerate() {
        events.push((qp.start, EV_OPEN, qi));
        events.push((qp.end, EV_CLOSE, qi));
    }
    for (ti, txn) in txns.iter().enumerate() {
        events.push((txn.date, EV_TXN, ti));
    }
    events.sort_unstable();

    // Keyed by (Reverse(start), declaration index): the first element is
    // always the current best match.
    let mut active: BTreeSet<(Reverse<NaiveDateTime>, usize)> = BTreeSet::new();

    for (_, kind, id) in events {
        match kind {
            EV_OPEN => {
                active.insert((Reverse(periods[id].start), id));
            }
            EV_CLOSE => {
                active.remove(&(Reverse(periods[id].start), id));
            }
            _ => {
                if let Some(&(_, best)) = active.first() {
                    txns[id].remanent = round2(periods[best].fixed);
                }
            }
        }
    }
    txns
}

// ---------------------------------------------------------------------------
// Overlay rules (p)
// ---------------------------------------------------------------------------

/// Add to each transaction's remanent the summed `extra` of every overlay
/// period containing its date. Same sweep as the override pass, but the
/// active set collapses to a running sum.
pub fn apply_overlays(mut txns: Vec<Transaction>, periods: &[OverlayPeriod]) -> Vec<Transaction> {
    if periods.is_empty() {
        return txns;
    }

    let mut events: Vec<(NaiveDateTime, u8, usize)> =
        Vec::with_capacity(txns.len() + 2 * periods.len());
    for (pi, pp) in periods.iter().enumerate() {
        events.push((pp.start, EV_OPEN, pi));
        events.push((pp.end, EV_CLOSE, pi));
    }
    for (ti, txn) in txns.iter().enumerate() {
        events.push((txn.date, EV_TXN, ti));
    }
    events.sort_unstable();

    let mut running = 0.0;
    for (_, kind, id) in events {
        match kind {
            EV_OPEN => running += periods[id].extra,
            EV_CLOSE => running -= periods[id].extra,
            _ => txns[id].remanent = round2(txns[id].remanent + running),
        }
    }
    txns
}

// ---------------------------------------------------------------------------
// Window grouping (k)
// ---------------------------------------------------------------------------

/// Sum remanents per reporting window. Each window is independent; a
/// transaction inside two overlapping windows counts fully in both.
///
/// Sorts once, then answers each window from a prefix-sum array with two
/// binary searches.
pub fn group_into_windows(txns: &[Transaction], windows: &[Window]) -> Vec<SavingsBucket> {
    if txns.is_empty() {
        return windows
            .iter()
            .map(|w| SavingsBucket {
                start: w.start,
                end: w.end,
                amount: 0.0,
            })
            .collect();
    }

    let mut paired: Vec<(NaiveDateTime, f64)> =
        txns.iter().map(|t| (t.date, t.remanent)).collect();
    paired.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut prefix = vec![0.0; paired.len() + 1];
    for (i, &(_, rem)) in paired.iter().enumerate() {
        prefix[i + 1] = prefix[i] + rem;
    }

    windows
        .iter()
        .map(|w| {
            let lo = paired.partition_point(|&(date, _)| date < w.start);
            let hi = paired.partition_point(|&(date, _)| date <= w.end);
            SavingsBucket {
                start: w.start,
                end: w.end,
                amount: round2(prefix[hi] - prefix[lo]),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Validity filter
// ---------------------------------------------------------------------------

pub struct FilterOutcome {
    pub valid: Vec<Transaction>,
    pub invalid: Vec<RejectedTransaction>,
}

/// Run the q then p passes, then split transactions by membership in at
/// least one window. No windows means everything is valid. Window counts are
/// small here, so the membership test scans them directly.
pub fn filter_transactions(
    txns: Vec<Transaction>,
    q: &[OverridePeriod],
    p: &[OverlayPeriod],
    k: &[Window],
) -> FilterOutcome {
    let adjusted = apply_overlays(apply_overrides(txns, q), p);

    if k.is_empty() {
        return FilterOutcome {
            valid: adjusted,
            invalid: Vec::new(),
        };
    }

    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for txn in adjusted {
        if k.iter().any(|w| w.start <= txn.date && txn.date <= w.end) {
            valid.push(txn);
        } else {
            invalid.push(RejectedTransaction {
                transaction: txn,
                message: OUTSIDE_WINDOWS_MSG.to_string(),
            });
        }
    }
    FilterOutcome { valid, invalid }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::parse_instant;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn dt(s: &str) -> NaiveDateTime {
        parse_instant(s).unwrap()
    }

    fn txn(date: &str, remanent: f64) -> Transaction {
        Transaction {
            date: dt(date),
            amount: 0.0,
            ceiling: 0.0,
            remanent,
        }
    }

    // Brute-force oracles: scan every period per transaction, applying the
    // documented tie-break directly.

    fn overrides_brute(mut txns: Vec<Transaction>, periods: &[OverridePeriod]) -> Vec<Transaction> {
        for txn in txns.iter_mut() {
            let mut best: Option<(NaiveDateTime, usize)> = None;
            for (qi, qp) in periods.iter().enumerate() {
                if qp.start <= txn.date && txn.date <= qp.end {
                    let better = match best {
                        None => true,
                        Some((bs, _)) => qp.start > bs,
                    };
                    if better {
                        best = Some((qp.start, qi));
                    }
                }
            }
            if let Some((_, qi)) = best {
                txn.remanent = round2(periods[qi].fixed);
            }
        }
        txns
    }

    fn overlays_brute(mut txns: Vec<Transaction>, periods: &[OverlayPeriod]) -> Vec<Transaction> {
        if periods.is_empty() {
            return txns;
        }
        for txn in txns.iter_mut() {
            let extra: f64 = periods
                .iter()
                .filter(|pp| pp.start <= txn.date && txn.date <= pp.end)
                .map(|pp| pp.extra)
                .sum();
            txn.remanent = round2(txn.remanent + extra);
        }
        txns
    }

    #[test]
    fn test_override_latest_start_wins() {
        let txns = vec![txn("2024-06-15 12:00:00", 40.0)];
        let periods = vec![
            OverridePeriod {
                start: dt("2024-06-01 00:00:00"),
                end: dt("2024-06-30 23:59:59"),
                fixed: 10.0,
            },
            OverridePeriod {
                start: dt("2024-06-10 00:00:00"),
                end: dt("2024-06-20 23:59:59"),
                fixed: 99.0,
            },
        ];
        let out = apply_overrides(txns, &periods);
        assert_eq!(out[0].remanent, 99.0);
    }

    #[test]
    fn test_override_tie_breaks_to_earliest_declared() {
        let txns = vec![txn("2024-06-15 12:00:00", 40.0)];
        // Same start; the first declared must win regardless of end or value.
        let periods = vec![
            OverridePeriod {
                start: dt("2024-06-01 00:00:00"),
                end: dt("2024-06-30 23:59:59"),
                fixed: 11.0,
            },
            OverridePeriod {
                start: dt("2024-06-01 00:00:00"),
                end: dt("2024-07-31 23:59:59"),
                fixed: 22.0,
            },
        ];
        let out = apply_overrides(txns, &periods);
        assert_eq!(out[0].remanent, 11.0);

        let reversed: Vec<OverridePeriod> = periods.into_iter().rev().collect();
        let out = apply_overrides(vec![txn("2024-06-15 12:00:00", 40.0)], &reversed);
        assert_eq!(out[0].remanent, 22.0);
    }

    #[test]
    fn test_override_boundaries_inclusive() {
        let periods = vec![OverridePeriod {
            start: dt("2024-06-01 00:00:00"),
            end: dt("2024-06-30 00:00:00"),
            fixed: 5.0,
        }];
        let txns = vec![
            txn("2024-06-01 00:00:00", 1.0),
            txn("2024-06-30 00:00:00", 2.0),
            txn("2024-06-30 00:00:01", 3.0),
            txn("2024-05-31 23:59:59", 4.0),
        ];
        let out = apply_overrides(txns, &periods);
        assert_eq!(out[0].remanent, 5.0);
        assert_eq!(out[1].remanent, 5.0);
        assert_eq!(out[2].remanent, 3.0);
        assert_eq!(out[3].remanent, 4.0);
    }

    #[test]
    fn test_empty_rule_sets_are_noops() {
        let txns = vec![txn("2024-06-15 12:00:00", 40.0)];
        let out = apply_overrides(txns.clone(), &[]);
        assert_eq!(out[0].remanent, 40.0);
        let out = apply_overlays(txns, &[]);
        assert_eq!(out[0].remanent, 40.0);
    }

    #[test]
    fn test_overlays_stack() {
        let periods = vec![
            OverlayPeriod {
                start: dt("2024-06-01 00:00:00"),
                end: dt("2024-06-30 23:59:59"),
                extra: 10.0,
            },
            OverlayPeriod {
                start: dt("2024-06-10 00:00:00"),
                end: dt("2024-06-20 23:59:59"),
                extra: 2.5,
            },
        ];
        let out = apply_overlays(
            vec![txn("2024-06-15 12:00:00", 40.0), txn("2024-06-25 12:00:00", 40.0)],
            &periods,
        );
        assert_eq!(out[0].remanent, 52.5);
        assert_eq!(out[1].remanent, 50.0);
    }

    #[test]
    fn test_sweeps_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let base = dt("2024-01-01 00:00:00");

        for _ in 0..50 {
            let txns: Vec<Transaction> = (0..rng.gen_range(0..40))
                .map(|_| Transaction {
                    date: base + Duration::seconds(rng.gen_range(0..5_000_000)),
                    amount: 0.0,
                    ceiling: 0.0,
                    remanent: f64::from(rng.gen_range(0..10_000_i32)) / 100.0,
                })
                .collect();

            let q: Vec<OverridePeriod> = (0..rng.gen_range(0..15))
                .map(|_| {
                    let a = rng.gen_range(0..5_000_000);
                    let b = rng.gen_range(0..5_000_000);
                    OverridePeriod {
                        start: base + Duration::seconds(a.min(b)),
                        end: base + Duration::seconds(a.max(b)),
                        fixed: f64::from(rng.gen_range(0..10_000_i32)) / 100.0,
                    }
                })
                .collect();

            let p: Vec<OverlayPeriod> = (0..rng.gen_range(0..15))
                .map(|_| {
                    let a = rng.gen_range(0..5_000_000);
                    let b = rng.gen_range(0..5_000_000);
                    OverlayPeriod {
                        start: base + Duration::seconds(a.min(b)),
                        end: base + Duration::seconds(a.max(b)),
                        extra: f64::from(rng.gen_range(0..2_500_i32)) / 100.0,
                    }
                })
                .collect();

            let sweep = apply_overrides(txns.clone(), &q);
            let brute = overrides_brute(txns.clone(), &q);
            for (s, b) in sweep.iter().zip(&brute) {
                assert_eq!(s.remanent, b.remanent, "override sweep diverged");
            }

            let sweep = apply_overlays(sweep, &p);
            let brute = overlays_brute(brute, &p);
            for (s, b) in sweep.iter().zip(&brute) {
                assert_eq!(s.remanent, b.remanent, "overlay sweep diverged");
            }
        }
    }

    #[test]
    fn test_grouping_empty_transactions() {
        let windows = vec![
            Window {
                start: dt("2024-01-01 00:00:00"),
                end: dt("2024-06-30 23:59:59"),
            },
            Window {
                start: dt("2024-07-01 00:00:00"),
                end: dt("2024-12-31 23:59:59"),
            },
        ];
        let buckets = group_into_windows(&[], &windows);
        assert_eq!(buckets.len(), 2);
        assert!(buckets.iter().all(|b| b.amount == 0.0));
    }

    #[test]
    fn test_overlapping_windows_count_fully_in_both() {
        let txns = vec![txn("2024-06-15 12:00:00", 30.0), txn("2024-08-01 12:00:00", 12.0)];
        let windows = vec![
            Window {
                start: dt("2024-01-01 00:00:00"),
                end: dt("2024-08-31 23:59:59"),
            },
            Window {
                start: dt("2024-06-01 00:00:00"),
                end: dt("2024-12-31 23:59:59"),
            },
        ];
        let buckets = group_into_windows(&txns, &windows);
        assert_eq!(buckets[0].amount, 42.0);
        assert_eq!(buckets[1].amount, 42.0);
    }

    #[test]
    fn test_grouping_window_boundaries_inclusive() {
        let txns = vec![
            txn("2024-06-01 00:00:00", 1.0),
            txn("2024-06-30 00:00:00", 2.0),
            txn("2024-06-30 00:00:01", 4.0),
        ];
        let windows = vec![Window {
            start: dt("2024-06-01 00:00:00"),
            end: dt("2024-06-30 00:00:00"),
        }];
        let buckets = group_into_windows(&txns, &windows);
        assert_eq!(buckets[0].amount, 3.0);
    }

    #[test]
    fn test_filter_no_windows_keeps_everything() {
        let txns = vec![txn("2024-06-15 12:00:00", 40.0)];
        let outcome = filter_transactions(txns, &[], &[], &[]);
        assert_eq!(outcome.valid.len(), 1);
        assert!(outcome.invalid.is_empty());
    }

    #[test]
    fn test_filter_partitions_by_window_membership() {
        let txns = vec![txn("2024-06-15 12:00:00", 40.0), txn("2024-09-15 12:00:00", 7.0)];
        let windows = vec![Window {
            start: dt("2024-06-01 00:00:00"),
            end: dt("2024-06-30 23:59:59"),
        }];
        let outcome = filter_transactions(txns, &[], &[], &windows);
        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.valid[0].remanent, 40.0);
        assert_eq!(outcome.invalid.len(), 1);
        assert_eq!(outcome.invalid[0].message, OUTSIDE_WINDOWS_MSG);
        assert_eq!(outcome.invalid[0].transaction.remanent, 7.0);
    }

    #[test]
    fn test_filter_applies_rules_before_classifying() {
        let txns = vec![txn("2024-06-15 12:00:00", 40.0)];
        let q = vec![OverridePeriod {
            start: dt("2024-06-01 00:00:00"),
            end: dt("2024-06-30 23:59:59"),
            fixed: 3.0,
        }];
        let p = vec![OverlayPeriod {
            start: dt("2024-06-01 00:00:00"),
            end: dt("2024-06-30 23:59:59"),
            extra: 1.5,
        }];
        let outcome = filter_transactions(txns, &q, &p, &[]);
        assert_eq!(outcome.valid[0].remanent, 4.5);
    }
}
