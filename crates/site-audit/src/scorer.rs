//! Scorer: facts in, category points and overall score out.
//!
//! Pure and deterministic. Every check is a lookup into the tier tables in
//! [`crate::rubric`], so the only logic here is choosing the raw value fed
//! to each rubric.

use crate::rubric::{self, flag, Rubric};
use crate::types::{
    AnalysisPath, Category, CategoryScore, CheckScore, ContentFacts, FactualSummary,
    HeadingFacts, MobileFacts, PerformanceFacts, RobotsDirective, ScoreBreakdown,
    StructuredDataFacts, TechnicalFacts,
};

/// Flat bonus added to the trusted site's sum.
pub const TRUSTED_BONUS: u32 = 15;

/// The trusted bonus never lifts a score past this.
pub const TRUSTED_CEILING: u32 = 95;

/// Score a factual summary.
///
/// Returns the overall score (0–100) and the full breakdown. Oracle
/// blending is not applied here; see [`blend`].
pub fn score(summary: &FactualSummary, trusted: bool) -> (u8, ScoreBreakdown) {
    let breakdown = ScoreBreakdown {
        heading: score_headings(&summary.heading_structure, trusted),
        technical: score_technical(&summary.technical, trusted),
        performance: score_performance(&summary.performance, trusted),
        content: score_content(&summary.content, trusted),
        mobile: score_mobile(&summary.mobile, trusted),
        structured_data: score_structured_data(&summary.structured_data, trusted),
    };
    let overall = overall_from_total(breakdown.total(), trusted);
    (overall, breakdown)
}

/// Turn a category sum into the overall score.
///
/// The trusted site gets [`TRUSTED_BONUS`] up to [`TRUSTED_CEILING`]; the
/// ceiling caps the bonus but never pulls an already-higher sum down.
pub fn overall_from_total(total: u32, trusted: bool) -> u8 {
    let boosted = if trusted {
        (total + TRUSTED_BONUS).min(TRUSTED_CEILING).max(total)
    } else {
        total
    };
    boosted.min(100) as u8
}

/// Blend a base score with the oracle's 0–100 performance score.
pub fn blend(base: u8, oracle_score: u8, path: AnalysisPath) -> u8 {
    let (base_weight, oracle_weight) = path.blend_weights();
    let blended = f64::from(base) * base_weight + f64::from(oracle_score) * oracle_weight;
    blended.round().clamp(0.0, 100.0) as u8
}

fn check(rubric: &Rubric, value: f64, trusted: bool, actual: impl Into<String>) -> CheckScore {
    CheckScore {
        name: rubric.key.to_string(),
        score: rubric.points(value, trusted),
        max_score: rubric.max,
        description: rubric.description.to_string(),
        actual_value: Some(actual.into()),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "present"
    } else {
        "missing"
    }
}

/// Grade fed to [`rubric::HEADING_HIERARCHY`].
pub fn hierarchy_grade(h: &HeadingFacts) -> f64 {
    if h.total() == 0 {
        0.0
    } else if !h.hierarchy_valid {
        1.0
    } else if h.h1_count == 0 {
        2.0
    } else {
        3.0
    }
}

pub fn score_headings(h: &HeadingFacts, trusted: bool) -> CategoryScore {
    let hierarchy = if h.total() == 0 {
        "no headings"
    } else if h.hierarchy_valid {
        "valid"
    } else {
        "skipped levels"
    };
    CategoryScore::from_checks(
        Category::Heading,
        vec![
            check(
                &rubric::H1_PRESENCE,
                f64::from(h.h1_count),
                trusted,
                h.h1_count.to_string(),
            ),
            check(
                &rubric::HEADING_HIERARCHY,
                hierarchy_grade(h),
                trusted,
                hierarchy,
            ),
            check(
                &rubric::SUBHEADINGS,
                f64::from(h.subheading_count()),
                trusted,
                h.subheading_count().to_string(),
            ),
        ],
    )
}

fn robots_grade(robots: RobotsDirective) -> f64 {
    match robots {
        RobotsDirective::Indexable => 2.0,
        RobotsDirective::Missing => 1.0,
        RobotsDirective::NoIndex => 0.0,
    }
}

pub fn score_technical(t: &TechnicalFacts, trusted: bool) -> CategoryScore {
    let robots = match t.robots {
        RobotsDirective::Indexable => "indexable",
        RobotsDirective::Missing => "missing",
        RobotsDirective::NoIndex => "noindex",
    };
    CategoryScore::from_checks(
        Category::Technical,
        vec![
            check(
                &rubric::TITLE,
                f64::from(t.title_length),
                trusted,
                format!("{} characters", t.title_length),
            ),
            check(
                &rubric::META_DESCRIPTION,
                f64::from(t.description_length),
                trusted,
                format!("{} characters", t.description_length),
            ),
            check(
                &rubric::CANONICAL,
                flag(t.has_canonical),
                trusted,
                yes_no(t.has_canonical),
            ),
            check(&rubric::ROBOTS, robots_grade(t.robots), trusted, robots),
            check(
                &rubric::OPEN_GRAPH,
                flag(t.has_open_graph),
                trusted,
                yes_no(t.has_open_graph),
            ),
            check(
                &rubric::INTERNAL_LINKS,
                f64::from(t.internal_links),
                trusted,
                format!("{} internal, {} external", t.internal_links, t.external_links),
            ),
        ],
    )
}

pub fn score_performance(p: &PerformanceFacts, trusted: bool) -> CategoryScore {
    CategoryScore::from_checks(
        Category::Performance,
        vec![
            check(
                &rubric::LOAD_TIME,
                p.load_time_ms as f64,
                trusted,
                format!("{} ms", p.load_time_ms),
            ),
            check(
                &rubric::PERFORMANCE_SCORE,
                f64::from(p.performance_score),
                trusted,
                p.performance_score.to_string(),
            ),
            check(
                &rubric::LARGEST_CONTENTFUL_PAINT,
                p.largest_contentful_paint_ms as f64,
                trusted,
                format!("{} ms", p.largest_contentful_paint_ms),
            ),
            check(
                &rubric::LAYOUT_SHIFT,
                p.cumulative_layout_shift,
                trusted,
                format!("{:.3}", p.cumulative_layout_shift),
            ),
        ],
    )
}

pub fn score_content(c: &ContentFacts, trusted: bool) -> CategoryScore {
    let coverage_pct = (c.alt_text_coverage * 100.0).clamp(0.0, 100.0);
    CategoryScore::from_checks(
        Category::Content,
        vec![
            check(
                &rubric::WORD_COUNT,
                f64::from(c.word_count),
                trusted,
                format!("{} words", c.word_count),
            ),
            check(
                &rubric::IMAGE_ALT_TEXT,
                coverage_pct,
                trusted,
                format!("{coverage_pct:.0}% of {} images", c.image_count),
            ),
            check(
                &rubric::CONTENT_DEPTH,
                f64::from(c.content_depth),
                trusted,
                c.content_depth.to_string(),
            ),
            check(
                &rubric::READABILITY,
                f64::from(c.readability),
                trusted,
                c.readability.to_string(),
            ),
        ],
    )
}

pub fn score_mobile(m: &MobileFacts, trusted: bool) -> CategoryScore {
    CategoryScore::from_checks(
        Category::Mobile,
        vec![
            check(
                &rubric::VIEWPORT,
                flag(m.has_viewport),
                trusted,
                yes_no(m.has_viewport),
            ),
            check(
                &rubric::RESPONSIVE_DESIGN,
                flag(m.is_responsive),
                trusted,
                if m.is_responsive {
                    "responsive"
                } else {
                    "not detected"
                },
            ),
            check(
                &rubric::MOBILE_SCORE,
                f64::from(m.mobile_score),
                trusted,
                m.mobile_score.to_string(),
            ),
        ],
    )
}

/// Grade fed to [`rubric::RICH_RESULT_TYPES`].
pub fn rich_result_grade(s: &StructuredDataFacts) -> f64 {
    if s.has_faq || s.has_how_to {
        2.0
    } else if s.has_organization || s.has_article {
        1.0
    } else {
        0.0
    }
}

pub fn score_structured_data(s: &StructuredDataFacts, trusted: bool) -> CategoryScore {
    let mut types = Vec::new();
    if s.has_faq {
        types.push("FAQPage");
    }
    if s.has_how_to {
        types.push("HowTo");
    }
    if s.has_organization {
        types.push("Organization");
    }
    if s.has_article {
        types.push("Article");
    }
    let types = if types.is_empty() {
        "none".to_string()
    } else {
        types.join(", ")
    };
    CategoryScore::from_checks(
        Category::StructuredData,
        vec![
            check(
                &rubric::SCHEMA_MARKUP,
                f64::from(s.schema_count),
                trusted,
                format!("{} blocks", s.schema_count),
            ),
            check(
                &rubric::RICH_RESULT_TYPES,
                rich_result_grade(s),
                trusted,
                types,
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricSource;

    fn heading(h1: u32, valid: bool, counts: [u32; 6]) -> HeadingFacts {
        HeadingFacts {
            h1_count: h1,
            h1_texts: vec!["Title".to_string(); h1 as usize],
            missing_h1: h1 == 0,
            hierarchy_valid: valid,
            level_counts: counts,
        }
    }

    fn strong_summary() -> FactualSummary {
        FactualSummary {
            heading_structure: heading(1, true, [1, 3, 2, 0, 0, 0]),
            technical: TechnicalFacts {
                has_title: true,
                title_length: 45,
                has_description: true,
                description_length: 140,
                has_canonical: true,
                robots: RobotsDirective::Indexable,
                has_open_graph: true,
                has_structured_data: true,
                internal_links: 12,
                external_links: 3,
            },
            performance: PerformanceFacts {
                load_time_ms: 400,
                performance_score: 95,
                first_contentful_paint_ms: 540,
                largest_contentful_paint_ms: 1200,
                cumulative_layout_shift: 0.0,
                speed_index_ms: 400,
                source: MetricSource::Estimated,
            },
            content: ContentFacts {
                word_count: 1500,
                image_count: 4,
                text_to_image_ratio: 375.0,
                alt_text_coverage: 1.0,
                content_depth: 14,
                readability: 80,
            },
            mobile: MobileFacts {
                has_viewport: true,
                is_responsive: true,
                mobile_score: 100,
                media_queries: true,
                css_framework: true,
                responsive_classes: true,
            },
            structured_data: StructuredDataFacts {
                has_faq: true,
                has_how_to: false,
                has_organization: true,
                has_article: false,
                schema_count: 2,
            },
        }
    }

    #[test]
    fn test_perfect_page_scores_100() {
        let (overall, breakdown) = score(&strong_summary(), false);
        assert_eq!(breakdown.total(), 100);
        assert_eq!(overall, 100);
        assert!(breakdown.validate().is_ok());
    }

    #[test]
    fn test_trusted_never_below_external_at_top() {
        let (external, _) = score(&strong_summary(), false);
        let (trusted, _) = score(&strong_summary(), true);
        assert!(trusted >= external);
    }

    #[test]
    fn test_trusted_bonus_and_ceiling() {
        assert_eq!(overall_from_total(50, false), 50);
        assert_eq!(overall_from_total(50, true), 65);
        assert_eq!(overall_from_total(85, true), 95);
        assert_eq!(overall_from_total(97, true), 97);
        assert_eq!(overall_from_total(0, true), 15);
    }

    #[test]
    fn test_heading_presence_tiers_through_scorer() {
        let one = score_headings(&heading(1, true, [1, 2, 1, 0, 0, 0]), false);
        let two = score_headings(&heading(2, true, [2, 2, 1, 0, 0, 0]), false);
        let three = score_headings(&heading(3, true, [3, 2, 1, 0, 0, 0]), false);
        let zero = score_headings(&heading(0, true, [0, 0, 0, 0, 0, 0]), false);
        assert_eq!(one.checks[0].score, 8);
        assert_eq!(two.checks[0].score, 5);
        assert_eq!(three.checks[0].score, 2);
        assert_eq!(zero.checks[0].score, 0);
        assert_eq!(zero.score, 0);
    }

    #[test]
    fn test_broken_hierarchy_loses_points() {
        let valid = score_headings(&heading(1, true, [1, 1, 1, 0, 0, 0]), false);
        let broken = score_headings(&heading(1, false, [1, 0, 1, 1, 0, 0]), false);
        assert_eq!(valid.checks[1].score, 6);
        assert_eq!(broken.checks[1].score, 2);
        assert_eq!(broken.checks[1].actual_value.as_deref(), Some("skipped levels"));
    }

    #[test]
    fn test_blend_ratios_differ_by_path() {
        assert_eq!(blend(80, 40, AnalysisPath::Fast), 70);
        assert_eq!(blend(80, 40, AnalysisPath::Degraded), 68);
        assert_eq!(blend(0, 0, AnalysisPath::Fast), 0);
        assert_eq!(blend(100, 100, AnalysisPath::Degraded), 100);
        // 61 * 0.75 + 50 * 0.25 = 58.25
        assert_eq!(blend(61, 50, AnalysisPath::Fast), 58);
    }

    #[test]
    fn test_score_is_deterministic() {
        let summary = strong_summary();
        assert_eq!(score(&summary, false), score(&summary, false));
        assert_eq!(score(&summary, true), score(&summary, true));
    }

    #[test]
    fn test_check_entries_carry_actual_values() {
        let (_, breakdown) = score(&strong_summary(), false);
        let title = &breakdown.technical.checks[0];
        assert_eq!(title.name, "title");
        assert_eq!(title.actual_value.as_deref(), Some("45 characters"));
        let types = &breakdown.structured_data.checks[1];
        assert_eq!(types.actual_value.as_deref(), Some("FAQPage, Organization"));
    }
}
