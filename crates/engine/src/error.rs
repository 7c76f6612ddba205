use std::fmt;

#[derive(Debug)]
pub enum ScoringError {
    /// Date string matched neither known source format, or denotes an
    /// invalid calendar date (e.g. 31 April).
    DateFormat { field: String, value: String },
    /// Return-period code is not a 4-character MMYY value.
    PeriodFormat(String),
    /// TOML parse / deserialization error for a rule config.
    ConfigParse(String),
    /// Rule config parsed but fails validation.
    ConfigValidation(String),
    /// A record in a batch could not be processed; aborts the batch.
    RecordProcessing {
        gstin: String,
        return_type: String,
        period: String,
        source: Box<ScoringError>,
    },
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateFormat { field, value } => {
                write!(f, "cannot parse {field} date '{value}'")
            }
            Self::PeriodFormat(value) => write!(f, "cannot parse return period '{value}'"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::RecordProcessing { gstin, return_type, period, source } => {
                write!(f, "record {gstin}/{return_type}/{period}: {source}")
            }
        }
    }
}

impl std::error::Error for ScoringError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RecordProcessing { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
