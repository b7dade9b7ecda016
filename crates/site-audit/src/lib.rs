//! Heuristic website audit.
//!
//! Turns a page's markup (or, when the page is unavailable, just its URL)
//! into six fact records, a weighted 0–100 score and ordered
//! recommendations. Everything here is synchronous and deterministic; the
//! fetch, the oracle query and the race between them live in
//! `site-audit-runtime`.

pub mod analyzer;
pub mod error;
pub mod fallback;
pub mod pipeline;
pub mod recommend;
pub mod rubric;
pub mod scorer;
pub mod target;
pub mod trust;
pub mod types;

pub use error::{AuditError, Result};
pub use pipeline::{degraded_path, fast_path};
pub use target::normalize_url;
pub use trust::TrustPolicy;
pub use types::{
    AnalysisPath, AnalysisResult, Category, CategoryScore, CheckScore, FactualSummary,
    FetchFailure, MetricSource, PerformanceReport, ScoreBreakdown, Urgency,
};
