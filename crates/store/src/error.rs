use std::fmt;

use gstscore_engine::ScoringError;

#[derive(Debug)]
pub enum StoreError {
    /// A record with the same (gstin, return_type, period) already
    /// exists; nothing was written.
    Duplicate {
        gstin: String,
        return_type: String,
        period: String,
    },
    /// No matching records for the taxpayer.
    NotFound(String),
    /// Malformed caller input (turnover, status hint).
    InvalidInput(String),
    /// Upstream payload missing or structurally invalid.
    Upstream(String),
    /// Engine-level failure (date/period normalization, config).
    Scoring(ScoringError),
    /// A stored row could not be read back into the model.
    Corrupt(String),
    /// Underlying SQLite error.
    Sqlite(rusqlite::Error),
}

impl StoreError {
    /// HTTP-style status class for the wire contract: 400 invalid
    /// input/duplicate, 404 not found, 500 internal or downstream.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Duplicate { .. } | Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Upstream(_) | Self::Scoring(_) | Self::Corrupt(_) | Self::Sqlite(_) => 500,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { gstin, return_type, period } => {
                write!(f, "record already exists: {gstin}/{return_type}/{period}")
            }
            Self::NotFound(gstin) => write!(f, "no applicable records found for {gstin}"),
            Self::InvalidInput(msg) => write!(f, "{msg}"),
            Self::Upstream(msg) => write!(f, "upstream data error: {msg}"),
            Self::Scoring(err) => write!(f, "{err}"),
            Self::Corrupt(msg) => write!(f, "stored record unreadable: {msg}"),
            Self::Sqlite(err) => write!(f, "database error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scoring(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

impl From<ScoringError> for StoreError {
    fn from(err: ScoringError) -> Self {
        Self::Scoring(err)
    }
}
