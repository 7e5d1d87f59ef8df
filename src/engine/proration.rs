//! Interval proration: day counts and even per-day allocation.

use crate::domain::common::DateRange;

/// Inclusive day count of a range; at least 1 by construction.
pub fn total_days(range: &DateRange) -> i64 {
    range.total_days()
}

/// Inclusive day overlap of two ranges, zero when disjoint.
pub fn days_of_overlap(a: &DateRange, b: &DateRange) -> i64 {
    a.overlap_days(b)
}

/// Even per-day share of a lump amount across a range.
pub fn per_day_amount(total_amount: f64, range: &DateRange) -> f64 {
    total_amount / range.total_days() as f64
}

/// Fraction of `burst` that falls inside `window`, in `[0, 1]`.
pub fn overlap_fraction(window: &DateRange, burst: &DateRange) -> f64 {
    days_of_overlap(window, burst) as f64 / total_days(burst) as f64
}
