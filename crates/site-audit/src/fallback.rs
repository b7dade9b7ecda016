//! Degraded-path result synthesis.
//!
//! When the page cannot be fetched inside the race window the result is
//! built from the URL alone: a baseline score from the shape of the host,
//! spread over the six categories and their checks, plus a synthetic but
//! complete factual summary. The output has exactly the shape of a
//! fast-path result.

use crate::analyzer::estimate_performance;
use crate::recommend::{affirmations, oracle_alert, CONSULTATION, URGENT_ORACLE_SCORE};
use crate::rubric::rubrics_for;
use crate::scorer::{self, TRUSTED_CEILING};
use crate::target::{bare_host, has_country_tld};
use crate::types::{
    AnalysisPath, AnalysisResult, Category, CategoryScore, CheckScore, ContentFacts,
    FactualSummary, FetchFailure, HeadingFacts, MobileFacts, PerformanceReport, RobotsDirective,
    ScoreBreakdown, StructuredDataFacts, TechnicalFacts,
};
use tracing::debug;
use url::Url;

const EXTERNAL_START: i32 = 50;
const TRUSTED_START: i32 = 80;
const SECURE_BONUS: i32 = 10;
const COUNTRY_TLD_BONUS: i32 = 8;
const LONG_HOST_PENALTY: i32 = 5;
const LONG_HOST_CHARS: usize = 20;
const NOISY_HOST_PENALTY: i32 = 3;

/// Baseline score derived from the URL's shape.
pub fn baseline_score(url: &Url, trusted: bool) -> u32 {
    let host = bare_host(url);
    let mut score = if trusted { TRUSTED_START } else { EXTERNAL_START };
    if url.scheme() == "https" {
        score += SECURE_BONUS;
    }
    if has_country_tld(&host) {
        score += COUNTRY_TLD_BONUS;
    }
    if host.chars().count() > LONG_HOST_CHARS {
        score -= LONG_HOST_PENALTY;
    }
    if host.chars().any(|c| c.is_ascii_digit() || c == '-') {
        score -= NOISY_HOST_PENALTY;
    }
    let ceiling = if trusted { TRUSTED_CEILING as i32 } else { 100 };
    score.clamp(0, ceiling) as u32
}

/// Split `total` across `weights` in proportion, using largest-remainder
/// rounding so the parts sum to `min(total, sum(weights))` and no part
/// exceeds its weight. Ties go to the earlier weight.
pub fn distribute(total: u32, weights: &[u32]) -> Vec<u32> {
    let weight_sum: u32 = weights.iter().sum();
    if weight_sum == 0 {
        return vec![0; weights.len()];
    }
    let total = total.min(weight_sum);

    let mut shares: Vec<u32> = Vec::with_capacity(weights.len());
    let mut remainders: Vec<(usize, u32)> = Vec::with_capacity(weights.len());
    for (i, &w) in weights.iter().enumerate() {
        let exact = u64::from(total) * u64::from(w);
        shares.push((exact / u64::from(weight_sum)) as u32);
        remainders.push((i, (exact % u64::from(weight_sum)) as u32));
    }

    let assigned: u32 = shares.iter().sum();
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for &(i, _) in remainders.iter().take((total - assigned) as usize) {
        shares[i] += 1;
    }
    shares
}

fn synthetic_category(category: Category, points: u32) -> CategoryScore {
    let rubrics = rubrics_for(category);
    let weights: Vec<u32> = rubrics.iter().map(|r| r.max).collect();
    let checks = rubrics
        .iter()
        .zip(distribute(points, &weights))
        .map(|(rubric, score)| CheckScore {
            name: rubric.key.to_string(),
            score,
            max_score: rubric.max,
            description: rubric.description.to_string(),
            actual_value: None,
        })
        .collect();
    CategoryScore::from_checks(category, checks)
}

/// Breakdown whose total equals `baseline`.
pub fn synthetic_breakdown(baseline: u32) -> ScoreBreakdown {
    let weights = Category::ALL.map(Category::max_score);
    let parts = distribute(baseline, &weights);
    let cat = |i: usize| synthetic_category(Category::ALL[i], parts[i]);
    ScoreBreakdown {
        heading: cat(0),
        technical: cat(1),
        performance: cat(2),
        content: cat(3),
        mobile: cat(4),
        structured_data: cat(5),
    }
}

/// Facts for a page that was never seen: one plausible H1 naming the host,
/// a title, and nothing that would have required the markup.
pub fn synthetic_summary(host: &str, waited_ms: u64) -> FactualSummary {
    FactualSummary {
        heading_structure: HeadingFacts {
            h1_count: 1,
            h1_texts: vec![host.to_string()],
            missing_h1: false,
            hierarchy_valid: true,
            level_counts: [1, 0, 0, 0, 0, 0],
        },
        technical: TechnicalFacts {
            has_title: true,
            title_length: host.chars().count() as u32,
            has_description: false,
            description_length: 0,
            has_canonical: false,
            robots: RobotsDirective::Missing,
            has_open_graph: false,
            has_structured_data: false,
            internal_links: 0,
            external_links: 0,
        },
        performance: estimate_performance(waited_ms, 0),
        content: ContentFacts {
            word_count: 0,
            image_count: 0,
            text_to_image_ratio: 0.0,
            alt_text_coverage: 1.0,
            content_depth: 0,
            readability: 0,
        },
        mobile: MobileFacts {
            has_viewport: false,
            is_responsive: false,
            mobile_score: 0,
            media_queries: false,
            css_framework: false,
            responsive_classes: false,
        },
        structured_data: StructuredDataFacts {
            has_faq: false,
            has_how_to: false,
            has_organization: false,
            has_article: false,
            schema_count: 0,
        },
    }
}

/// First-line advice naming what actually went wrong.
fn failure_advice(failure: FetchFailure, waited_ms: u64) -> String {
    match failure {
        FetchFailure::Timeout => format!(
            "The site did not respond within {:.1} seconds. Check hosting capacity and server response time.",
            waited_ms as f64 / 1000.0
        ),
        FetchFailure::HttpError { status } => format!(
            "The site returned HTTP {status} instead of a page. Check that the address serves your homepage."
        ),
        FetchFailure::NetworkError => "The site could not be reached. Check the domain's DNS records and the server's TLS certificate.".to_string(),
    }
}

fn degraded_recommendations(url: &Url, trusted: bool, failure: FetchFailure, waited_ms: u64) -> Vec<String> {
    if trusted {
        return affirmations();
    }
    let mut out = vec![failure_advice(failure, waited_ms)];
    if url.scheme() != "https" {
        out.push("Serve every page over HTTPS.".to_string());
    }
    out.extend(
        [
            "Confirm each page has one H1 heading, a 30 to 60 character title and a 120 to 160 character meta description.",
            "Add a viewport meta tag and a responsive layout for mobile visitors.",
            "Publish schema.org structured data (Organization, FAQPage) as JSON-LD.",
            CONSULTATION,
        ]
        .map(String::from),
    );
    out
}

/// Complete result built from the URL alone.
///
/// `waited_ms` is how long the fetch ran before `failure` was known; it is
/// recorded as the load time.
pub fn fallback(url: &Url, trusted: bool, failure: FetchFailure, waited_ms: u64) -> AnalysisResult {
    let host = bare_host(url);
    let baseline = baseline_score(url, trusted);
    debug!(url = %url, baseline, trusted, ?failure, "synthesizing degraded result");

    AnalysisResult {
        url: url.to_string(),
        title: host.clone(),
        description: String::new(),
        path: AnalysisPath::Degraded,
        facts: synthetic_summary(&host, waited_ms),
        score_breakdown: synthetic_breakdown(baseline),
        overall_score: baseline.min(100) as u8,
        recommendations: degraded_recommendations(url, trusted, failure, waited_ms),
    }
}

/// Fold an oracle report into a degraded result.
///
/// The performance category is re-scored from the oracle's figures and the
/// new total is blended with the oracle score on degraded-path weights.
pub fn with_oracle(mut result: AnalysisResult, report: &PerformanceReport, trusted: bool) -> AnalysisResult {
    let refined = result.facts.performance.refined_by(report);
    result.score_breakdown.performance = scorer::score_performance(&refined, trusted);
    result.facts.performance = refined;

    let base = result.score_breakdown.total().min(100) as u8;
    let oracle_score = report.score_percent();
    result.overall_score = scorer::blend(base, oracle_score, AnalysisPath::Degraded);

    if !trusted && oracle_score < URGENT_ORACLE_SCORE {
        result.recommendations.insert(0, oracle_alert(oracle_score));
    }
    result
}
