//! Inbound date normalization. The registry API emits DD/MM/YYYY, the
//! returns-track API emits DD-MM-YYYY; nothing else is accepted.

use chrono::NaiveDate;

use crate::error::ScoringError;
use crate::model::Period;

const REGISTRY_FORMAT: &str = "%d/%m/%Y";
const FILING_FORMAT: &str = "%d-%m-%Y";

/// Parse a registry date (DD/MM/YYYY). Empty input is the well-defined
/// "unknown" sentinel, distinct from a parse failure.
pub fn parse_registry_date(value: &str) -> Result<Option<NaiveDate>, ScoringError> {
    parse_with(value, REGISTRY_FORMAT, "registry")
}

/// Parse a return-filing date (DD-MM-YYYY). Same sentinel semantics.
pub fn parse_filing_date(value: &str) -> Result<Option<NaiveDate>, ScoringError> {
    parse_with(value, FILING_FORMAT, "filing")
}

fn parse_with(value: &str, format: &str, field: &str) -> Result<Option<NaiveDate>, ScoringError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, format)
        .map(Some)
        .map_err(|_| ScoringError::DateFormat {
            field: field.into(),
            value: value.into(),
        })
}

/// Split a 4-char MMYY period code: first two chars = month, last two =
/// year. Both halves must be integers; the month range is not validated
/// beyond that (upstream behavior).
pub fn parse_period(code: &str) -> Result<Period, ScoringError> {
    let code = code.trim();
    if code.len() != 4 || !code.is_ascii() {
        return Err(ScoringError::PeriodFormat(code.into()));
    }
    let month: u32 = code[..2]
        .parse()
        .map_err(|_| ScoringError::PeriodFormat(code.into()))?;
    let year: u32 = code[2..]
        .parse()
        .map_err(|_| ScoringError::PeriodFormat(code.into()))?;
    Ok(Period { month, year })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
