//! Fee allocation: splits a burst budget into media and agency-fee amounts.

use tracing::warn;

use crate::domain::burst::Burst;

/// Monthly run-rate split of a burst budget, before day-level proration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSplit {
    pub media_amount: f64,
    pub fee_amount: f64,
}

/// Resolves the four fee-accounting treatments.
///
/// `budget_includes_fees` says whether the stored number is gross
/// (fee-inclusive) or net media. `client_pays_for_media` means the agency only
/// bills the fee, so media is always zero in that case; only the fee formula
/// differs by the gross/net flag.
///
/// | client pays media | budget incl. fees | media            | fee                        |
/// |-------------------|-------------------|------------------|----------------------------|
/// | true              | true              | 0                | budget × f/100             |
/// | true              | false             | 0                | budget/(100−f) × f         |
/// | false             | true              | budget × (100−f)/100 | budget × f/100         |
/// | false             | false             | budget           | budget × f / (100−f)       |
pub fn allocate(
    budget: f64,
    fee_percentage: f64,
    client_pays_for_media: bool,
    budget_includes_fees: bool,
) -> FeeSplit {
    // Parse-time validation rejects fees outside [0, 100); if one slips
    // through, degrade to 0% rather than divide by zero.
    let fee_pct = if (0.0..100.0).contains(&fee_percentage) {
        fee_percentage
    } else {
        warn!(fee_percentage, "fee percentage out of range, treating as 0");
        0.0
    };

    match (client_pays_for_media, budget_includes_fees) {
        (true, true) => FeeSplit {
            media_amount: 0.0,
            fee_amount: budget * fee_pct / 100.0,
        },
        (true, false) => FeeSplit {
            media_amount: 0.0,
            fee_amount: budget / (100.0 - fee_pct) * fee_pct,
        },
        (false, true) => FeeSplit {
            media_amount: budget * (100.0 - fee_pct) / 100.0,
            fee_amount: budget * fee_pct / 100.0,
        },
        (false, false) => FeeSplit {
            media_amount: budget,
            fee_amount: budget * fee_pct / (100.0 - fee_pct),
        },
    }
}

/// Convenience wrapper reading the flags off a burst.
pub fn allocate_burst(burst: &Burst) -> FeeSplit {
    allocate(
        burst.budget_amount,
        burst.fee_percentage,
        burst.client_pays_for_media,
        burst.budget_includes_fees,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_budget_agency_pays_media() {
        let split = allocate(20000.0, 20.0, false, false);
        assert_eq!(split.media_amount, 20000.0);
        assert!((split.fee_amount - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn gross_budget_client_pays_media() {
        let split = allocate(20000.0, 20.0, true, true);
        assert_eq!(split.media_amount, 0.0);
        assert!((split.fee_amount - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn net_budget_client_pays_media() {
        // 20000/(100-20) * 20 = 5000
        let split = allocate(20000.0, 20.0, true, false);
        assert_eq!(split.media_amount, 0.0);
        assert!((split.fee_amount - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn gross_budget_agency_pays_media() {
        let split = allocate(20000.0, 20.0, false, true);
        assert!((split.media_amount - 16000.0).abs() < 1e-9);
        assert!((split.fee_amount - 4000.0).abs() < 1e-9);
        assert!((split.media_amount + split.fee_amount - 20000.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_fee_degrades_to_zero() {
        let split = allocate(1000.0, 100.0, false, false);
        assert_eq!(split.media_amount, 1000.0);
        assert_eq!(split.fee_amount, 0.0);
        assert!(allocate(1000.0, 100.0, true, false).fee_amount.is_finite());
    }

    #[test]
    fn zero_fee_means_no_fee_in_every_branch() {
        for &(client_pays, inclusive) in
            &[(false, false), (false, true), (true, false), (true, true)]
        {
            let split = allocate(500.0, 0.0, client_pays, inclusive);
            assert_eq!(split.fee_amount, 0.0);
        }
    }
}
