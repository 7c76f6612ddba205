//! `gstscore-engine` — GST filing-compliance scoring engine.
//!
//! Pure engine crate: receives a taxpayer's pre-loaded filing records,
//! recomputes due dates and delays, aggregates the trailing window and
//! classifies the taxpayer Pass/Fail. No CLI, HTTP, or storage
//! dependencies.

pub mod classify;
pub mod config;
pub mod dates;
pub mod delay;
pub mod duedate;
pub mod engine;
pub mod error;
pub mod model;
pub mod window;

pub use config::ScoringConfig;
pub use engine::score;
pub use error::ScoringError;
pub use model::{ComplianceResult, FiledReturn, FilingRecord, Period, RegistrySnapshot, ReturnType, ScoreOutcome, WindowStats};
