//! Trailing-window aggregation over a taxpayer's scored records.

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::ScoringConfig;
use crate::model::{FilingRecord, WindowStats};

/// Aggregate delay statistics over records filed within the trailing
/// window ending at `now`. Only scored return types count. The window
/// has no upper bound, matching upstream: records dated after `now`
/// would be included.
pub fn window_stats(
    records: &[FilingRecord],
    now: NaiveDate,
    config: &ScoringConfig,
) -> WindowStats {
    let cutoff = now - Duration::days(config.window_days);
    let immediate_past_month = previous_month_number(now);

    let mut count = 0usize;
    let mut total_delay = 0u64;
    let mut long_delays = 0usize;
    let mut filed_in_past_month = false;

    for record in records {
        if !record.return_type.is_scored() || record.filing_date < cutoff {
            continue;
        }
        count += 1;
        total_delay += u64::from(record.delay_days);
        if record.delay_days > config.long_delay_threshold_days {
            long_delays += 1;
        }
        // Month number only; year deliberately not checked (upstream
        // simplification, kept as documented behavior).
        if record.filing_date.month() == immediate_past_month {
            filed_in_past_month = true;
        }
    }

    let avg_delay = if count == 0 {
        0.0
    } else {
        total_delay as f64 / count as f64
    };

    WindowStats {
        avg_delay,
        long_delay_count: long_delays,
        filed_in_immediate_past_month: filed_in_past_month,
        records_in_window: count,
    }
}

/// The calendar month immediately preceding `now`'s month.
fn previous_month_number(now: NaiveDate) -> u32 {
    if now.month() == 1 { 12 } else { now.month() - 1 }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
