//! Constructors for the two terminal results.
//!
//! Network I/O lives in the runtime; these take whatever the fetch and the
//! oracle produced and return a validated [`AnalysisResult`].

use crate::analyzer::{self, PageContext};
use crate::error::Result;
use crate::fallback;
use crate::recommend::recommend;
use crate::scorer;
use crate::types::{AnalysisPath, AnalysisResult, FetchFailure, PerformanceReport};
use tracing::info;
use url::Url;

/// Analyze fetched markup and score it.
///
/// `url` is the requested address reported in the result; `page.url` is
/// where the markup was actually served from after redirects, and is the
/// base for link classification.
pub fn fast_path(
    url: &Url,
    markup: &str,
    page: PageContext<'_>,
    report: Option<&PerformanceReport>,
    trusted: bool,
) -> Result<AnalysisResult> {
    let page = analyzer::analyze(markup, &page);

    let summary = match report {
        Some(report) => {
            let refined = page.summary.performance.refined_by(report);
            page.summary.with_performance(refined)
        }
        None => page.summary,
    };

    let (base, breakdown) = scorer::score(&summary, trusted);
    breakdown.validate()?;
    let overall_score = match report {
        Some(report) => scorer::blend(base, report.score_percent(), AnalysisPath::Fast),
        None => base,
    };
    let recommendations = recommend(&summary, trusted);

    info!(
        url = %url,
        base,
        overall = overall_score,
        oracle = report.is_some(),
        method = ?page.method,
        "fast path complete"
    );

    Ok(AnalysisResult {
        url: url.to_string(),
        title: page.title,
        description: page.description,
        path: AnalysisPath::Fast,
        facts: summary,
        score_breakdown: breakdown,
        overall_score,
        recommendations,
    })
}

/// Synthesize a result for a page that could not be fetched.
pub fn degraded_path(
    url: &Url,
    trusted: bool,
    failure: FetchFailure,
    waited_ms: u64,
    report: Option<&PerformanceReport>,
) -> Result<AnalysisResult> {
    let mut result = fallback::fallback(url, trusted, failure, waited_ms);
    if let Some(report) = report {
        result = fallback::with_oracle(result, report, trusted);
    }
    result.score_breakdown.validate()?;

    info!(
        url = %url,
        overall = result.overall_score,
        oracle = report.is_some(),
        ?failure,
        "degraded path complete"
    );
    Ok(result)
}
