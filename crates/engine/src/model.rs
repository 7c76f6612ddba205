use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Return types and periods
// ---------------------------------------------------------------------------

/// Category of periodic filing. Only GSTR-3B and GSTR-1 participate in
/// scoring; anything else is carried through for audit but ignored by
/// the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReturnType {
    Gstr3b,
    Gstr1,
    Other(String),
}

impl ReturnType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "GSTR3B" => Self::Gstr3b,
            "GSTR1" => Self::Gstr1,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Gstr3b => "GSTR3B",
            Self::Gstr1 => "GSTR1",
            Self::Other(code) => code,
        }
    }

    /// Whether this return type counts toward the compliance score.
    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Gstr3b | Self::Gstr1)
    }
}

impl From<String> for ReturnType {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<ReturnType> for String {
    fn from(rt: ReturnType) -> Self {
        rt.code().to_string()
    }
}

impl std::fmt::Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The month/year a filing covers, as split from the upstream 4-char
/// MMYY code. `year` keeps the two-digit upstream value; the filing
/// date carries the full calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub month: u32,
    pub year: u32,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}{:02}", self.month, self.year)
    }
}

// ---------------------------------------------------------------------------
// Compliance result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceResult {
    Pass,
    Fail,
    Unset,
}

impl ComplianceResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Unset => "unset",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pass" | "Pass" => Some(Self::Pass),
            "fail" | "Fail" => Some(Self::Fail),
            "unset" | "N/A" => Some(Self::Unset),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComplianceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Registry data
// ---------------------------------------------------------------------------

/// Taxpayer registration snapshot from the registry search API.
/// Preserved on every record for audit; only `state` feeds computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub legal_name: String,
    pub trade_name: String,
    pub entity_type: String,
    pub registration_date: Option<NaiveDate>,
    pub last_update: Option<NaiveDate>,
    pub state: String,
    pub city: String,
    pub business_natures: Vec<String>,
    pub e_invoice_status: String,
    /// Raw upstream payload, kept verbatim.
    pub raw: serde_json::Value,
}

/// One entry of the upstream `EFiledlist` returns-track response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiledReturn {
    #[serde(rename = "rtntype")]
    pub return_type: String,
    /// DD-MM-YYYY date of filing.
    #[serde(rename = "dof", default)]
    pub filing_date: String,
    /// 4-char MMYY period code.
    #[serde(rename = "ret_prd", default)]
    pub period: String,
    #[serde(default)]
    pub status: String,
}

// ---------------------------------------------------------------------------
// Filing records
// ---------------------------------------------------------------------------

/// One taxpayer's filing event for one return type and period.
/// Uniqueness key: (gstin, return_type, period).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingRecord {
    pub gstin: String,
    pub return_type: ReturnType,
    pub period: Period,
    pub filing_date: NaiveDate,
    /// Jurisdiction state from the registry snapshot's principal address.
    pub state: String,
    /// None = unknown; the resolver falls back to the default due-day.
    pub annual_turnover: Option<u64>,
    pub delayed: bool,
    /// Invariant: 0 whenever `delayed` is false.
    pub delay_days: u32,
    pub result: ComplianceResult,
    pub registry: RegistrySnapshot,
}

// ---------------------------------------------------------------------------
// Aggregation + outcome
// ---------------------------------------------------------------------------

/// Aggregate delay statistics over the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStats {
    pub avg_delay: f64,
    /// Records whose delay exceeds the long-delay threshold.
    pub long_delay_count: usize,
    /// Any window record filed in the calendar month immediately before
    /// the reference date. Month number only; year is not checked.
    pub filed_in_immediate_past_month: bool,
    pub records_in_window: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreMeta {
    pub engine_version: String,
    /// Reference date the trailing window was anchored to.
    pub as_of: NaiveDate,
}

/// Result of one taxpayer-level scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreOutcome {
    pub meta: ScoreMeta,
    pub stats: WindowStats,
    pub result: ComplianceResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_type_round_trips_upstream_codes() {
        assert_eq!(ReturnType::from_code("GSTR3B"), ReturnType::Gstr3b);
        assert_eq!(ReturnType::from_code("GSTR1"), ReturnType::Gstr1);
        assert_eq!(
            ReturnType::from_code("GSTR9"),
            ReturnType::Other("GSTR9".into())
        );
        assert_eq!(ReturnType::from_code("GSTR9").code(), "GSTR9");
    }

    #[test]
    fn only_3b_and_1_are_scored() {
        assert!(ReturnType::Gstr3b.is_scored());
        assert!(ReturnType::Gstr1.is_scored());
        assert!(!ReturnType::Other("GSTR9".into()).is_scored());
    }

    #[test]
    fn period_display_pads() {
        let p = Period { month: 4, year: 24 };
        assert_eq!(p.to_string(), "0424");
    }

    #[test]
    fn filed_return_deserializes_upstream_field_names() {
        let json = r#"{"rtntype":"GSTR3B","dof":"24-05-2024","ret_prd":"0424","status":"Filed"}"#;
        let fr: FiledReturn = serde_json::from_str(json).unwrap();
        assert_eq!(fr.return_type, "GSTR3B");
        assert_eq!(fr.filing_date, "24-05-2024");
        assert_eq!(fr.period, "0424");
    }
}
