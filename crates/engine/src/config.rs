use serde::Deserialize;

use crate::error::ScoringError;

/// Statutory due-day tiers and pass/fail thresholds, injected so
/// jurisdiction rules are swappable without code changes. `Default` is
/// the current statutory calendar.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Due-day when annual turnover is unknown (conservative).
    pub default_due_day: u32,
    /// Turnover above which the high-turnover due-day applies
    /// regardless of state. Rupees; 5 crore.
    pub turnover_threshold: u64,
    pub high_turnover_due_day: u32,
    /// States whose under-threshold filers get the tier due-day.
    pub tier_states: Vec<String>,
    pub tier_due_day: u32,
    /// Everyone else under the threshold.
    pub standard_due_day: u32,
    /// Pass thresholds over the trailing window.
    pub avg_delay_max: f64,
    pub long_delay_max: usize,
    /// A delay strictly greater than this many days is a "long delay".
    pub long_delay_threshold_days: u32,
    /// Trailing window length.
    pub window_days: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_due_day: 20,
            turnover_threshold: 50_000_000,
            high_turnover_due_day: 20,
            tier_states: [
                "Chhattisgarh",
                "Madhya Pradesh",
                "Gujarat",
                "Daman and Diu",
                "Dadra and Nagar Haveli",
                "Maharashtra",
                "Karnataka",
                "Goa",
                "Lakshadweep",
                "Kerala",
                "Tamil Nadu",
                "Puducherry",
                "Andaman and Nicobar Islands",
                "Telangana",
                "Andhra Pradesh",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            tier_due_day: 22,
            standard_due_day: 24,
            avg_delay_max: 7.0,
            long_delay_max: 1,
            long_delay_threshold_days: 15,
            window_days: 365,
        }
    }
}

impl ScoringConfig {
    pub fn from_toml(input: &str) -> Result<Self, ScoringError> {
        let config: ScoringConfig =
            toml::from_str(input).map_err(|e| ScoringError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, day) in [
            ("default_due_day", self.default_due_day),
            ("high_turnover_due_day", self.high_turnover_due_day),
            ("tier_due_day", self.tier_due_day),
            ("standard_due_day", self.standard_due_day),
        ] {
            if !(1..=31).contains(&day) {
                return Err(ScoringError::ConfigValidation(format!(
                    "{name} must be 1-31, got {day}"
                )));
            }
        }

        if self.tier_states.is_empty() {
            return Err(ScoringError::ConfigValidation(
                "tier_states must not be empty".into(),
            ));
        }

        if self.window_days < 1 {
            return Err(ScoringError::ConfigValidation(format!(
                "window_days must be >= 1, got {}",
                self.window_days
            )));
        }

        if self.avg_delay_max < 0.0 {
            return Err(ScoringError::ConfigValidation(format!(
                "avg_delay_max must be non-negative, got {}",
                self.avg_delay_max
            )));
        }

        Ok(())
    }

    /// Exact string membership, matching upstream behavior. Input is
    /// trimmed; no further normalization.
    pub fn is_tier_state(&self, state: &str) -> bool {
        let state = state.trim();
        self.tier_states.iter().any(|s| s == state)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
