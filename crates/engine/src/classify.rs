//! Pass/Fail classification over the trailing-window statistics.

use crate::config::ScoringConfig;
use crate::model::{ComplianceResult, WindowStats};

/// Pass iff the average delay and long-delay count are within the
/// configured thresholds AND no trailing-window record was filed in the
/// calendar month immediately before the reference date.
///
/// The third condition is preserved exactly from the source system. It
/// reads inverted (a taxpayer who filed nothing trivially satisfies it);
/// see the ignored test below before "fixing" it.
pub fn classify(stats: &WindowStats, config: &ScoringConfig) -> ComplianceResult {
    let pass = stats.avg_delay <= config.avg_delay_max
        && stats.long_delay_count <= config.long_delay_max
        && !stats.filed_in_immediate_past_month;
    if pass {
        ComplianceResult::Pass
    } else {
        ComplianceResult::Fail
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
