//! Orchestrates one taxpayer-level scoring run over an in-memory
//! working set: set turnover, recompute per-record delays, aggregate
//! the trailing window once, classify once, stamp every record.
//!
//! The caller persists the mutated set atomically afterwards; the
//! engine never re-reads mid-run, so there is no read-modify-write
//! window between the turnover update and the aggregation.

use chrono::NaiveDate;

use crate::classify::classify;
use crate::config::ScoringConfig;
use crate::delay::compute_delay;
use crate::duedate::{due_date_for, resolve_due_day};
use crate::model::{FilingRecord, ScoreMeta, ScoreOutcome};
use crate::window::window_stats;

/// Score one taxpayer's records as of `now`. Mutates the working set in
/// place (turnover, delay fields, result) and returns the
/// taxpayer-level outcome. Aggregation runs after every per-record
/// recomputation, so it sees post-update delay values.
pub fn score(
    records: &mut [FilingRecord],
    annual_turnover: Option<u64>,
    now: NaiveDate,
    config: &ScoringConfig,
) -> ScoreOutcome {
    for record in records.iter_mut() {
        record.annual_turnover = annual_turnover;

        let due_day = resolve_due_day(&record.state, annual_turnover, config);
        let due_date = due_date_for(record.filing_date, due_day);
        let (delayed, delay_days) = compute_delay(record.filing_date, due_date);
        record.delayed = delayed;
        record.delay_days = delay_days;
    }

    let stats = window_stats(records, now, config);
    let result = classify(&stats, config);

    // Taxpayer-level result, stamped on every record in scope.
    for record in records.iter_mut() {
        record.result = result;
    }

    ScoreOutcome {
        meta: ScoreMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            as_of: now,
        },
        stats,
        result,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
