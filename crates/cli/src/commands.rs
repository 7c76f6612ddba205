//! Command implementations for `gsc`.

use std::path::PathBuf;

use chrono::NaiveDate;

use gstscore_engine::model::FilingRecord;
use gstscore_engine::ScoringConfig;
use gstscore_registry::{RegistryClient, RegistryCredentials};
use gstscore_store::{IngestDefaults, RecordStore};

use crate::CliError;

// ============================================================================
// fetch
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn cmd_fetch(
    gstin: String,
    fy: String,
    asp_id: String,
    password: String,
    turnover: Option<String>,
    delay_days: Option<String>,
    db: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let annual_turnover = parse_turnover_arg(turnover.as_deref())?;

    let client = RegistryClient::new(RegistryCredentials { asp_id, password });
    let snapshot = client.taxpayer_search(&gstin).map_err(CliError::registry)?;
    let returns = client.filed_returns(&gstin, &fy).map_err(CliError::registry)?;

    let mut store = open_store(db)?;
    let defaults = IngestDefaults {
        annual_turnover,
        delay_days,
        result: None,
    };
    let fetched_on = chrono::Local::now().date_naive();
    let outcome = store
        .ingest(&gstin, &snapshot, &returns, &defaults, fetched_on)
        .map_err(CliError::store)?;

    if outcome.coerced_delay_values > 0 {
        eprintln!(
            "note: {} delay value(s) were not integers and were stored as 0",
            outcome.coerced_delay_values
        );
    }

    if json {
        let body = serde_json::json!({
            "message": "Data fetched and saved successfully.",
            "gstin": gstin,
            "records": outcome.records.len(),
            "coerced_delay_values": outcome.coerced_delay_values,
        });
        println!("{}", body);
    } else {
        println!(
            "{}: stored {} record(s) for {}",
            gstin,
            outcome.records.len(),
            snapshot.legal_name
        );
    }
    Ok(())
}

// ============================================================================
// recompute
// ============================================================================

pub fn cmd_recompute(
    gstin: String,
    turnover: Option<String>,
    status: Option<String>,
    as_of: Option<String>,
    config: Option<PathBuf>,
    db: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let now = parse_as_of(as_of.as_deref())?;

    let mut store = open_store(db)?;
    let records = store
        .update_turnover_and_recompute(
            &gstin,
            turnover.as_deref(),
            status.as_deref(),
            now,
            &config,
        )
        .map_err(CliError::store)?;

    print_records(&records, json)?;
    if !json {
        // All scored records carry the same taxpayer-level verdict.
        if let Some(first) = records.first() {
            println!("result: {}", first.result);
        }
    }
    Ok(())
}

// ============================================================================
// records
// ============================================================================

pub fn cmd_records(gstin: String, db: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let store = open_store(db)?;
    let records = store.records_for(&gstin).map_err(CliError::store)?;
    print_records(&records, json)
}

// ============================================================================
// validate-config
// ============================================================================

pub fn cmd_validate_config(path: PathBuf) -> Result<(), CliError> {
    let input = std::fs::read_to_string(&path)
        .map_err(|e| CliError::config(format!("cannot read {}: {}", path.display(), e)))?;
    let config = ScoringConfig::from_toml(&input).map_err(|e| CliError::config(e.to_string()))?;

    println!(
        "ok: {} tier state(s), due days {}/{}/{}, window {} days",
        config.tier_states.len(),
        config.high_turnover_due_day,
        config.tier_due_day,
        config.standard_due_day,
        config.window_days
    );
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_turnover_arg(input: Option<&str>) -> Result<Option<u64>, CliError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<u64>().map(Some).map_err(|_| {
            CliError::args(format!("invalid --turnover value '{value}'"))
                .with_hint("pass turnover in whole rupees, or omit it if unknown")
        }),
    }
}

fn parse_as_of(input: Option<&str>) -> Result<NaiveDate, CliError> {
    match input {
        None => Ok(chrono::Local::now().date_naive()),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            CliError::args(format!("invalid --as-of value '{value}'"))
                .with_hint("expected YYYY-MM-DD")
        }),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ScoringConfig, CliError> {
    match path {
        None => Ok(ScoringConfig::default()),
        Some(path) => {
            let input = std::fs::read_to_string(&path)
                .map_err(|e| CliError::config(format!("cannot read {}: {}", path.display(), e)))?;
            ScoringConfig::from_toml(&input).map_err(|e| CliError::config(e.to_string()))
        }
    }
}

fn open_store(db: Option<PathBuf>) -> Result<RecordStore, CliError> {
    let path = match db {
        Some(path) => path,
        None => default_db_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::config(format!("cannot create {}: {}", parent.display(), e)))?;
    }
    RecordStore::open(&path).map_err(CliError::store)
}

fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_local_dir()
        .map(|d| d.join("gstscore").join("records.db"))
        .ok_or_else(|| {
            CliError::config("no per-user data directory on this platform")
                .with_hint("pass --db explicitly")
        })
}

fn print_records(records: &[FilingRecord], json: bool) -> Result<(), CliError> {
    if json {
        let body = serde_json::to_string_pretty(records)
            .map_err(|e| CliError::config(e.to_string()))?;
        println!("{}", body);
    } else {
        for record in records {
            println!("{}", record_line(record));
        }
    }
    Ok(())
}

fn record_line(record: &FilingRecord) -> String {
    let turnover = match record.annual_turnover {
        Some(t) => t.to_string(),
        None => "unknown".to_string(),
    };
    format!(
        "{} {:<7} period {} filed {} delay {:>3}d turnover {} result {}",
        record.gstin,
        record.return_type,
        record.period,
        record.filing_date.format("%d-%m-%Y"),
        record.delay_days,
        turnover,
        record.result
    )
}

// ============================================================================
// Tests
// ============================================================================
