//! Statutory due-date resolution per state and turnover tier.

use chrono::{Datelike, NaiveDate};

use crate::config::ScoringConfig;

/// Resolve the statutory filing due-day-of-month. Precedence: unknown
/// turnover → default; turnover over the threshold → high-turnover day
/// regardless of state; tier state → tier day; else standard day.
pub fn resolve_due_day(
    state: &str,
    annual_turnover: Option<u64>,
    config: &ScoringConfig,
) -> u32 {
    match annual_turnover {
        None => config.default_due_day,
        Some(t) if t > config.turnover_threshold => config.high_turnover_due_day,
        Some(_) if config.is_tier_state(state) => config.tier_due_day,
        Some(_) => config.standard_due_day,
    }
}

/// The due date for a filing is the due-day applied to the filing's own
/// month/year. Naive day substitution fails on short months, so a
/// due-day past the end of the month clamps to the month's last day.
pub fn due_date_for(filing_date: NaiveDate, due_day: u32) -> NaiveDate {
    let year = filing_date.year();
    let month = filing_date.month();
    let day = due_day.min(days_in_month(year, month));
    // day is now always valid for (year, month)
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(filing_date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is always valid");
    first_of_next.pred_opt().expect("not before CE").day()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn unknown_turnover_defaults_to_20() {
        assert_eq!(resolve_due_day("Maharashtra", None, &config()), 20);
        assert_eq!(resolve_due_day("Delhi", None, &config()), 20);
    }

    #[test]
    fn over_threshold_is_20_regardless_of_state() {
        assert_eq!(resolve_due_day("Maharashtra", Some(50_000_001), &config()), 20);
        assert_eq!(resolve_due_day("Delhi", Some(60_000_000), &config()), 20);
    }

    #[test]
    fn threshold_is_exclusive() {
        // Exactly 5 crore is not "over", so the state tier applies.
        assert_eq!(resolve_due_day("Maharashtra", Some(50_000_000), &config()), 22);
        assert_eq!(resolve_due_day("Delhi", Some(50_000_000), &config()), 24);
    }

    #[test]
    fn tier_states_get_22() {
        for state in ["Maharashtra", "Karnataka", "Tamil Nadu", "Telangana", "Puducherry"] {
            assert_eq!(resolve_due_day(state, Some(1_000_000), &config()), 22, "{state}");
        }
    }

    #[test]
    fn other_states_get_24() {
        for state in ["Delhi", "Uttar Pradesh", "West Bengal", "Rajasthan"] {
            assert_eq!(resolve_due_day(state, Some(1_000_000), &config()), 24, "{state}");
        }
    }

    #[test]
    fn due_date_substitutes_day_in_same_month() {
        let filed = NaiveDate::from_ymd_opt(2024, 5, 24).unwrap();
        assert_eq!(
            due_date_for(filed, 22),
            NaiveDate::from_ymd_opt(2024, 5, 22).unwrap()
        );
    }

    #[test]
    fn due_day_24_fits_february() {
        // Max statutory due-day is 24 <= 28, so no clamp in practice.
        let filed = NaiveDate::from_ymd_opt(2023, 2, 25).unwrap();
        assert_eq!(
            due_date_for(filed, 24),
            NaiveDate::from_ymd_opt(2023, 2, 24).unwrap()
        );
    }

    #[test]
    fn synthetic_due_day_clamps_to_short_month() {
        // Guards future table changes: day 30 in non-leap February.
        let filed = NaiveDate::from_ymd_opt(2023, 2, 10).unwrap();
        assert_eq!(
            due_date_for(filed, 30),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );

        let leap = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(
            due_date_for(leap, 30),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(
            due_date_for(april, 31),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
        );
    }

    #[test]
    fn december_rollover_in_days_in_month() {
        let filed = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        assert_eq!(
            due_date_for(filed, 31),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }
}
