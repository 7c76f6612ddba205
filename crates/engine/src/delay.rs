use chrono::NaiveDate;

/// Delay flag and magnitude for one filing against its due date.
/// Delayed iff filed strictly after due; days never negative.
pub fn compute_delay(filing_date: NaiveDate, due_date: NaiveDate) -> (bool, u32) {
    if filing_date > due_date {
        let days = filing_date.signed_duration_since(due_date).num_days();
        (true, days as u32)
    } else {
        (false, 0)
    }
}
