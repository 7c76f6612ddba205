//! `gstscore-store` — SQLite-backed store for per-return-type,
//! per-period filing-compliance records.
//!
//! Recompute runs load the taxpayer's working set, hand it to the
//! engine, and persist the result inside one immediate transaction, so
//! a taxpayer's record set is never observable mid-update.

pub mod error;

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, TransactionBehavior};

use gstscore_engine::dates::{parse_filing_date, parse_period};
use gstscore_engine::model::{
    ComplianceResult, FiledReturn, FilingRecord, Period, RegistrySnapshot, ReturnType,
};
use gstscore_engine::{score, ScoringConfig, ScoringError};

pub use error::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS filing_records (
    gstin TEXT NOT NULL,
    return_type TEXT NOT NULL,
    period_month INTEGER NOT NULL,
    period_year INTEGER NOT NULL,
    filing_date TEXT NOT NULL,       -- ISO 8601
    state TEXT NOT NULL,
    annual_turnover INTEGER,         -- NULL = unknown
    delayed INTEGER NOT NULL DEFAULT 0,
    delay_days INTEGER NOT NULL DEFAULT 0,
    result TEXT NOT NULL DEFAULT 'unset',
    registry_json TEXT NOT NULL,
    fetch_date TEXT NOT NULL,
    PRIMARY KEY (gstin, return_type, period_month, period_year)
);
"#;

/// Return types that participate in scoring; recompute scopes its
/// working set to these.
const SCORED_TYPES: [&str; 2] = ["GSTR3B", "GSTR1"];

// ---------------------------------------------------------------------------
// Ingest inputs
// ---------------------------------------------------------------------------

/// Caller-supplied defaults applied to every record of an ingest batch.
#[derive(Debug, Clone, Default)]
pub struct IngestDefaults {
    pub annual_turnover: Option<u64>,
    /// Upstream delay value as received — string-typed legacy data.
    /// Coerced to an integer at this boundary; anything uncoercible
    /// becomes 0 and is counted in the outcome.
    pub delay_days: Option<String>,
    pub result: Option<ComplianceResult>,
}

#[derive(Debug)]
pub struct IngestOutcome {
    pub records: Vec<FilingRecord>,
    /// Data-quality counter: delay values that failed integer coercion
    /// and were stored as 0.
    pub coerced_delay_values: usize,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Create one record per filed return. Fails on the first duplicate
    /// (gstin, return_type, period) with nothing written; the whole
    /// batch is one transaction.
    pub fn ingest(
        &mut self,
        gstin: &str,
        snapshot: &RegistrySnapshot,
        filed_returns: &[FiledReturn],
        defaults: &IngestDefaults,
        fetched_on: NaiveDate,
    ) -> Result<IngestOutcome, StoreError> {
        if filed_returns.is_empty() {
            return Err(StoreError::Upstream(
                "no valid return data in returns-track response".into(),
            ));
        }

        let (delay_days, coerced) = coerce_delay(defaults.delay_days.as_deref());
        let coerced_delay_values = if coerced { filed_returns.len() } else { 0 };
        let result = defaults.result.unwrap_or(ComplianceResult::Unset);
        let registry_json = serde_json::to_string(snapshot)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut records = Vec::with_capacity(filed_returns.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO filing_records
                 (gstin, return_type, period_month, period_year, filing_date, state,
                  annual_turnover, delayed, delay_days, result, registry_json, fetch_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;

            for filed in filed_returns {
                let record = build_record(gstin, snapshot, filed, delay_days, result, defaults)?;

                let insert = stmt.execute(params![
                    record.gstin,
                    record.return_type.code(),
                    record.period.month,
                    record.period.year,
                    record.filing_date.format("%Y-%m-%d").to_string(),
                    record.state,
                    record.annual_turnover.map(|t| t as i64),
                    record.delayed as i64,
                    i64::from(record.delay_days),
                    record.result.as_str(),
                    registry_json,
                    fetched_on.format("%Y-%m-%d").to_string(),
                ]);

                match insert {
                    Ok(_) => records.push(record),
                    Err(err) if is_constraint_violation(&err) => {
                        return Err(StoreError::Duplicate {
                            gstin: gstin.into(),
                            return_type: filed.return_type.clone(),
                            period: filed.period.clone(),
                        });
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        tx.commit()?;
        Ok(IngestOutcome { records, coerced_delay_values })
    }

    /// Set the taxpayer's turnover, recompute delays and the
    /// compliance result over the scored working set, and persist
    /// everything atomically. The immediate transaction doubles as the
    /// taxpayer-scoped write lock.
    pub fn update_turnover_and_recompute(
        &mut self,
        gstin: &str,
        turnover_input: Option<&str>,
        status_hint: Option<&str>,
        now: NaiveDate,
        config: &ScoringConfig,
    ) -> Result<Vec<FilingRecord>, StoreError> {
        let turnover = parse_turnover(turnover_input)?;
        let hint = match status_hint {
            None => None,
            Some(s) => Some(ComplianceResult::from_str(s).ok_or_else(|| {
                StoreError::InvalidInput(format!("invalid status value '{s}'"))
            })?),
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut records = {
            let mut stmt = tx.prepare(
                "SELECT gstin, return_type, period_month, period_year, filing_date, state,
                        annual_turnover, delayed, delay_days, result, registry_json
                 FROM filing_records
                 WHERE gstin = ?1 AND return_type IN (?2, ?3)
                 ORDER BY period_year, period_month, return_type",
            )?;
            let rows = stmt.query_map(
                params![gstin, SCORED_TYPES[0], SCORED_TYPES[1]],
                row_to_raw,
            )?;

            let mut records = Vec::new();
            for row in rows {
                records.push(raw_to_record(row?)?);
            }
            records
        };

        if records.is_empty() {
            return Err(StoreError::NotFound(gstin.into()));
        }

        // The status hint is accepted for wire compatibility; the
        // computed result always supersedes it.
        if let Some(hint) = hint {
            for record in &mut records {
                record.result = hint;
            }
        }

        score(&mut records, turnover, now, config);

        {
            let mut stmt = tx.prepare(
                "UPDATE filing_records
                 SET annual_turnover = ?1, delayed = ?2, delay_days = ?3, result = ?4
                 WHERE gstin = ?5 AND return_type = ?6
                   AND period_month = ?7 AND period_year = ?8",
            )?;
            for record in &records {
                stmt.execute(params![
                    record.annual_turnover.map(|t| t as i64),
                    record.delayed as i64,
                    i64::from(record.delay_days),
                    record.result.as_str(),
                    record.gstin,
                    record.return_type.code(),
                    record.period.month,
                    record.period.year,
                ])?;
            }
        }

        tx.commit()?;
        Ok(records)
    }

    /// All stored records for a taxpayer, every return type.
    pub fn records_for(&self, gstin: &str) -> Result<Vec<FilingRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT gstin, return_type, period_month, period_year, filing_date, state,
                    annual_turnover, delayed, delay_days, result, registry_json
             FROM filing_records
             WHERE gstin = ?1
             ORDER BY period_year, period_month, return_type",
        )?;
        let rows = stmt.query_map(params![gstin], row_to_raw)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(raw_to_record(row?)?);
        }

        if records.is_empty() {
            return Err(StoreError::NotFound(gstin.into()));
        }
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Input normalization
// ---------------------------------------------------------------------------

/// Empty/absent turnover means "unknown"; anything else must be a
/// non-negative integer.
fn parse_turnover(input: Option<&str>) -> Result<Option<u64>, StoreError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| StoreError::InvalidInput(format!("invalid annual_turnover value '{value}'"))),
    }
}

/// Digits parse, everything else (including overflow) becomes 0. The
/// bool reports whether a non-empty value was discarded.
fn coerce_delay(input: Option<&str>) -> (u32, bool) {
    match input.map(str::trim) {
        None | Some("") => (0, false),
        Some(value) => match value.parse::<u32>() {
            Ok(days) => (days, false),
            Err(_) => (0, true),
        },
    }
}

fn build_record(
    gstin: &str,
    snapshot: &RegistrySnapshot,
    filed: &FiledReturn,
    delay_days: u32,
    result: ComplianceResult,
    defaults: &IngestDefaults,
) -> Result<FilingRecord, StoreError> {
    let wrap = |source: ScoringError| {
        StoreError::Scoring(ScoringError::RecordProcessing {
            gstin: gstin.into(),
            return_type: filed.return_type.clone(),
            period: filed.period.clone(),
            source: Box::new(source),
        })
    };

    let period = parse_period(&filed.period).map_err(wrap)?;
    let filing_date = parse_filing_date(&filed.filing_date)
        .map_err(wrap)?
        .ok_or_else(|| {
            StoreError::Upstream(format!(
                "filed return {}/{} has no date of filing",
                filed.return_type, filed.period
            ))
        })?;

    Ok(FilingRecord {
        gstin: gstin.into(),
        return_type: ReturnType::from_code(&filed.return_type),
        period,
        filing_date,
        state: snapshot.state.clone(),
        annual_turnover: defaults.annual_turnover,
        delayed: delay_days > 0,
        delay_days,
        result,
        registry: snapshot.clone(),
    })
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

type RawRow = (
    String,         // gstin
    String,         // return_type
    u32,            // period_month
    u32,            // period_year
    String,         // filing_date
    String,         // state
    Option<i64>,    // annual_turnover
    i64,            // delayed
    i64,            // delay_days
    String,         // result
    String,         // registry_json
);

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn raw_to_record(raw: RawRow) -> Result<FilingRecord, StoreError> {
    let (
        gstin,
        return_type,
        period_month,
        period_year,
        filing_date,
        state,
        annual_turnover,
        delayed,
        delay_days,
        result,
        registry_json,
    ) = raw;

    let filing_date = NaiveDate::parse_from_str(&filing_date, "%Y-%m-%d")
        .map_err(|_| StoreError::Corrupt(format!("bad filing_date '{filing_date}' for {gstin}")))?;
    let result = ComplianceResult::from_str(&result)
        .ok_or_else(|| StoreError::Corrupt(format!("bad result '{result}' for {gstin}")))?;
    let registry: RegistrySnapshot = serde_json::from_str(&registry_json)
        .map_err(|e| StoreError::Corrupt(format!("bad registry payload for {gstin}: {e}")))?;

    Ok(FilingRecord {
        gstin,
        return_type: ReturnType::from_code(&return_type),
        period: Period { month: period_month, year: period_year },
        filing_date,
        state,
        annual_turnover: annual_turnover.map(|t| t as u64),
        delayed: delayed != 0,
        delay_days: delay_days as u32,
        result,
        registry,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
