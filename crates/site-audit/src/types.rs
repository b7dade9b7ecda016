//! Core data types for a single site analysis.
//!
//! Every record here is built once per request and never mutated after
//! construction. Stages hand each other fresh values instead.

use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};

/// Heading inventory of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingFacts {
    /// Number of `<h1>` elements.
    pub h1_count: u32,
    /// Text of each `<h1>`, in document order.
    pub h1_texts: Vec<String>,
    pub missing_h1: bool,
    /// False once a heading jumps more than one level deeper than its predecessor.
    pub hierarchy_valid: bool,
    /// Heading count per level; index 0 is H1.
    pub level_counts: [u32; 6],
}

impl HeadingFacts {
    /// Total headings across all six levels.
    pub fn total(&self) -> u32 {
        self.level_counts.iter().sum()
    }

    /// H2 plus H3 count.
    pub fn subheading_count(&self) -> u32 {
        self.level_counts[1] + self.level_counts[2]
    }
}

/// Robots meta directive as it affects indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotsDirective {
    /// No robots meta tag.
    Missing,
    /// A directive is present and allows indexing.
    Indexable,
    /// The directive contains `noindex` (or `none`).
    NoIndex,
}

impl RobotsDirective {
    /// Classify the `content` of a robots meta tag.
    pub fn from_content(content: Option<&str>) -> Self {
        match content {
            None => Self::Missing,
            Some(c) => {
                let lower = c.to_ascii_lowercase();
                let blocked = lower
                    .split(|ch: char| ch == ',' || ch.is_whitespace())
                    .any(|token| token == "noindex" || token == "none");
                if blocked {
                    Self::NoIndex
                } else {
                    Self::Indexable
                }
            }
        }
    }
}

/// Technical SEO signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalFacts {
    pub has_title: bool,
    /// Title length in characters.
    pub title_length: u32,
    pub has_description: bool,
    /// Meta description length in characters.
    pub description_length: u32,
    pub has_canonical: bool,
    pub robots: RobotsDirective,
    pub has_open_graph: bool,
    pub has_structured_data: bool,
    pub internal_links: u32,
    pub external_links: u32,
}

/// Where the performance figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricSource {
    /// Derived from our own fetch latency and markup.
    Estimated,
    /// Overwritten by the external performance oracle.
    Oracle {
        /// Oracle performance score, 0–100.
        score: u8,
    },
}

/// Load-time measurements and the derived performance estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceFacts {
    pub load_time_ms: u64,
    /// 0–100 performance estimate.
    pub performance_score: u8,
    pub first_contentful_paint_ms: u64,
    pub largest_contentful_paint_ms: u64,
    pub cumulative_layout_shift: f64,
    pub speed_index_ms: u64,
    pub source: MetricSource,
}

impl PerformanceFacts {
    /// New facts with the oracle's figures replacing the estimates.
    ///
    /// The measured load time is kept; everything the oracle reports wins.
    pub fn refined_by(&self, report: &PerformanceReport) -> PerformanceFacts {
        let score = report.score_percent();
        PerformanceFacts {
            load_time_ms: self.load_time_ms,
            performance_score: score,
            first_contentful_paint_ms: report.first_contentful_paint_ms.round() as u64,
            largest_contentful_paint_ms: report.largest_contentful_paint_ms.round() as u64,
            cumulative_layout_shift: report.cumulative_layout_shift,
            speed_index_ms: report.speed_index_ms.round() as u64,
            source: MetricSource::Oracle { score },
        }
    }

    /// Oracle score, if these figures came from the oracle.
    pub fn oracle_score(&self) -> Option<u8> {
        match self.source {
            MetricSource::Oracle { score } => Some(score),
            MetricSource::Estimated => None,
        }
    }
}

/// Content statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFacts {
    pub word_count: u32,
    pub image_count: u32,
    /// Words per image; equals the word count on pages without images.
    pub text_to_image_ratio: f64,
    /// Fraction (0.0–1.0) of images carrying non-empty alt text.
    pub alt_text_coverage: f64,
    /// Paragraph count plus list count.
    pub content_depth: u32,
    /// 0–100, higher reads easier.
    pub readability: u8,
}

/// Mobile readiness signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileFacts {
    pub has_viewport: bool,
    pub is_responsive: bool,
    /// 0–100, additive over the detected signals.
    pub mobile_score: u8,
    pub media_queries: bool,
    pub css_framework: bool,
    pub responsive_classes: bool,
}

/// Structured data inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDataFacts {
    pub has_faq: bool,
    pub has_how_to: bool,
    pub has_organization: bool,
    pub has_article: bool,
    pub schema_count: u32,
}

/// The six-part bundle of facts extracted from one page, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactualSummary {
    pub heading_structure: HeadingFacts,
    pub technical: TechnicalFacts,
    pub performance: PerformanceFacts,
    pub content: ContentFacts,
    pub mobile: MobileFacts,
    pub structured_data: StructuredDataFacts,
}

impl FactualSummary {
    /// Same facts with the performance record swapped out.
    pub fn with_performance(self, performance: PerformanceFacts) -> FactualSummary {
        FactualSummary {
            performance,
            ..self
        }
    }
}

/// Report returned by the external performance oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    /// Performance category score, 0.0–1.0.
    pub score: f64,
    pub first_contentful_paint_ms: f64,
    pub largest_contentful_paint_ms: f64,
    pub cumulative_layout_shift: f64,
    pub speed_index_ms: f64,
}

impl PerformanceReport {
    /// Category score scaled to 0–100.
    pub fn score_percent(&self) -> u8 {
        (self.score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// The six fixed scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Heading,
    Technical,
    Performance,
    Content,
    Mobile,
    StructuredData,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Heading,
        Category::Technical,
        Category::Performance,
        Category::Content,
        Category::Mobile,
        Category::StructuredData,
    ];

    /// Fixed category maximum. The six maxima sum to 100.
    pub const fn max_score(self) -> u32 {
        match self {
            Category::Heading => 20,
            Category::Technical => 25,
            Category::Performance => 20,
            Category::Content => 20,
            Category::Mobile => 10,
            Category::StructuredData => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Heading => "Heading structure",
            Category::Technical => "Technical SEO",
            Category::Performance => "Performance",
            Category::Content => "Content quality",
            Category::Mobile => "Mobile readiness",
            Category::StructuredData => "Structured data",
        }
    }
}

/// Score of one named check inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckScore {
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,
}

/// Score of one category with its per-check entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub score: u32,
    pub max_score: u32,
    pub checks: Vec<CheckScore>,
}

impl CategoryScore {
    /// Sum the checks into a category capped at the category maximum.
    pub fn from_checks(category: Category, checks: Vec<CheckScore>) -> Self {
        let max_score = category.max_score();
        let score = checks.iter().map(|c| c.score).sum::<u32>().min(max_score);
        Self {
            score,
            max_score,
            checks,
        }
    }
}

/// Fixed tree of the six category scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub heading: CategoryScore,
    pub technical: CategoryScore,
    pub performance: CategoryScore,
    pub content: CategoryScore,
    pub mobile: CategoryScore,
    pub structured_data: CategoryScore,
}

impl ScoreBreakdown {
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Heading => &self.heading,
            Category::Technical => &self.technical,
            Category::Performance => &self.performance,
            Category::Content => &self.content,
            Category::Mobile => &self.mobile,
            Category::StructuredData => &self.structured_data,
        }
    }

    /// Category scores in fixed order.
    pub fn categories(&self) -> [(Category, &CategoryScore); 6] {
        Category::ALL.map(|c| (c, self.get(c)))
    }

    /// Sum of the six category scores.
    pub fn total(&self) -> u32 {
        self.categories().iter().map(|(_, c)| c.score).sum()
    }

    /// Sum of the six category maxima.
    pub fn max_total(&self) -> u32 {
        self.categories().iter().map(|(_, c)| c.max_score).sum()
    }

    /// Check the structural invariants of the breakdown.
    ///
    /// A failure here is a programming defect in the scorer or the
    /// fallback generator, never a property of the analyzed page.
    pub fn validate(&self) -> Result<()> {
        if self.max_total() != 100 {
            return Err(AuditError::Invariant(format!(
                "category maxima sum to {}, expected 100",
                self.max_total()
            )));
        }
        for (category, cat) in self.categories() {
            if cat.max_score != category.max_score() {
                return Err(AuditError::Invariant(format!(
                    "{category:?} max is {}, expected {}",
                    cat.max_score,
                    category.max_score()
                )));
            }
            if cat.score > cat.max_score {
                return Err(AuditError::Invariant(format!(
                    "{category:?} scored {} over its max {}",
                    cat.score, cat.max_score
                )));
            }
            let check_max: u32 = cat.checks.iter().map(|c| c.max_score).sum();
            if check_max != cat.max_score {
                return Err(AuditError::Invariant(format!(
                    "{category:?} checks allow {check_max}, category max is {}",
                    cat.max_score
                )));
            }
            if let Some(over) = cat.checks.iter().find(|c| c.score > c.max_score) {
                return Err(AuditError::Invariant(format!(
                    "check {} scored {} over its max {}",
                    over.name, over.score, over.max_score
                )));
            }
        }
        Ok(())
    }
}

/// Route the analysis took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPath {
    /// The page was fetched inside the race window and analyzed.
    Fast,
    /// The page was unavailable; the result was synthesized from the URL.
    Degraded,
}

impl AnalysisPath {
    /// `(base weight, oracle weight)` used when blending oracle data.
    pub const fn blend_weights(self) -> (f64, f64) {
        match self {
            AnalysisPath::Fast => (0.75, 0.25),
            AnalysisPath::Degraded => (0.7, 0.3),
        }
    }
}

/// Why the page was unavailable on the degraded path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// Nothing arrived inside the race window, or the client gave up.
    Timeout,
    /// The server answered with a non-success status.
    HttpError { status: u16 },
    /// DNS, connect or TLS failure.
    NetworkError,
}

/// Follow-up urgency derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=59 => Urgency::High,
            60..=79 => Urgency::Medium,
            _ => Urgency::Low,
        }
    }
}

/// Terminal result of one analysis. Both paths produce exactly this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub title: String,
    pub description: String,
    pub path: AnalysisPath,
    #[serde(flatten)]
    pub facts: FactualSummary,
    pub score_breakdown: ScoreBreakdown,
    /// Clamped to 0–100.
    pub overall_score: u8,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    pub fn urgency(&self) -> Urgency {
        Urgency::from_score(self.overall_score)
    }
}
