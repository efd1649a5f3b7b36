//! Ideal-function selection and test-point classification.
//!
//! ```text
//!  training Series ─┐
//!                   ├─ evaluate ─▶ ErrorMap ─ select_best ─▶ FitResult
//!  candidates ──────┘                                           │
//!                                    test Point ─ classify ◀────┘
//!                                                   │
//!                                                   ▼
//!                                            Classification
//! ```
//!
//! Everything here is pure: no I/O, no shared state.

pub mod classify;
pub mod evaluate;
pub mod select;

pub use classify::{
    classify, classify_all, Classification, Match, OutOfDomainPolicy, DEFAULT_THRESHOLD_FACTOR,
};
pub use evaluate::{evaluate, CandidateScore, ErrorMap};
pub use select::{fit_all, select_best, BestFit, FitResult};

/// Errors raised by the fitting core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("candidate '{candidate}' has no value at x = {x}, required by training series '{training}'")]
    DomainMismatch {
        training: String,
        candidate: String,
        x: f64,
    },

    #[error("no candidate functions supplied")]
    EmptyCandidateSet,

    #[error("no candidate function is defined at x = {x}")]
    PointOutOfDomain { x: f64 },

    #[error("threshold factor must be finite and non-negative, got {0}")]
    InvalidThresholdFactor(f64),
}
