//! Tier rubrics: ordered threshold tables mapping a raw measurement to points.
//!
//! Each rubric is evaluated top to bottom and the first matching tier
//! wins. Every tier carries two allocations, one for external sites and a
//! more generous one for the trusted (operator's own) site.
//!
//! Check maxima inside a category must add up to [`Category::max_score`];
//! the tests at the bottom of this file hold that in place.

use crate::types::Category;

/// Predicate half of a tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    AtLeast(f64),
    AtMost(f64),
    /// Inclusive on both ends.
    Between(f64, f64),
    Equals(f64),
    Always,
}

impl Threshold {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Threshold::AtLeast(min) => value >= min,
            Threshold::AtMost(max) => value <= max,
            Threshold::Between(lo, hi) => value >= lo && value <= hi,
            Threshold::Equals(v) => value == v,
            Threshold::Always => true,
        }
    }
}

/// One row of a rubric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub when: Threshold,
    pub external: u32,
    pub trusted: u32,
}

const fn tier(when: Threshold, external: u32, trusted: u32) -> Tier {
    Tier {
        when,
        external,
        trusted,
    }
}

/// A named check with its ordered tier table.
#[derive(Debug, PartialEq)]
pub struct Rubric {
    pub key: &'static str,
    pub description: &'static str,
    pub max: u32,
    pub tiers: &'static [Tier],
}

impl Rubric {
    /// Points for `value`; first match wins, capped at the check maximum.
    pub fn points(&self, value: f64, trusted: bool) -> u32 {
        self.tiers
            .iter()
            .find(|t| t.when.matches(value))
            .map(|t| if trusted { t.trusted } else { t.external })
            .unwrap_or(0)
            .min(self.max)
    }

    /// Index of the tier `value` lands in, if any.
    pub fn tier_index(&self, value: f64) -> Option<usize> {
        self.tiers.iter().position(|t| t.when.matches(value))
    }
}

/// Encode a boolean fact for a rubric.
pub fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

// ── Heading (20) ────────────────────────────────────────────────────────────

pub static H1_PRESENCE: Rubric = Rubric {
    key: "h1Presence",
    description: "Exactly one H1 heading",
    max: 8,
    tiers: &[
        tier(Threshold::Equals(1.0), 8, 8),
        tier(Threshold::Equals(2.0), 5, 6),
        tier(Threshold::AtLeast(3.0), 2, 4),
        tier(Threshold::Always, 0, 0),
    ],
};

/// Grades: 3 valid with H1, 2 valid without H1, 1 broken, 0 no headings.
pub static HEADING_HIERARCHY: Rubric = Rubric {
    key: "hierarchy",
    description: "Heading levels nest without skipping",
    max: 6,
    tiers: &[
        tier(Threshold::Equals(3.0), 6, 6),
        tier(Threshold::Equals(2.0), 3, 4),
        tier(Threshold::Equals(1.0), 2, 4),
        tier(Threshold::Always, 0, 0),
    ],
};

pub static SUBHEADINGS: Rubric = Rubric {
    key: "subheadings",
    description: "H2/H3 subheadings structure the content",
    max: 6,
    tiers: &[
        tier(Threshold::AtLeast(3.0), 6, 6),
        tier(Threshold::AtLeast(1.0), 4, 5),
        tier(Threshold::Always, 0, 2),
    ],
};

// ── Technical (25) ──────────────────────────────────────────────────────────

pub static TITLE: Rubric = Rubric {
    key: "title",
    description: "Title tag of 30-60 characters",
    max: 7,
    tiers: &[
        tier(Threshold::Between(30.0, 60.0), 7, 7),
        tier(Threshold::Between(10.0, 29.0), 5, 6),
        tier(Threshold::Between(61.0, 70.0), 5, 6),
        tier(Threshold::Between(1.0, 9.0), 3, 5),
        tier(Threshold::AtLeast(71.0), 3, 5),
        tier(Threshold::Always, 0, 0),
    ],
};

pub static META_DESCRIPTION: Rubric = Rubric {
    key: "metaDescription",
    description: "Meta description of 120-160 characters",
    max: 7,
    tiers: &[
        tier(Threshold::Between(120.0, 160.0), 7, 7),
        tier(Threshold::Between(70.0, 119.0), 5, 6),
        tier(Threshold::Between(161.0, 200.0), 5, 6),
        tier(Threshold::Between(1.0, 69.0), 3, 5),
        tier(Threshold::AtLeast(201.0), 3, 5),
        tier(Threshold::Always, 0, 0),
    ],
};

pub static CANONICAL: Rubric = Rubric {
    key: "canonical",
    description: "Canonical link declared",
    max: 3,
    tiers: &[tier(Threshold::Equals(1.0), 3, 3), tier(Threshold::Always, 0, 2)],
};

/// Grades: 2 indexable directive, 1 no directive, 0 noindex.
pub static ROBOTS: Rubric = Rubric {
    key: "robots",
    description: "Robots directive allows indexing",
    max: 2,
    tiers: &[
        tier(Threshold::Equals(2.0), 2, 2),
        tier(Threshold::Equals(1.0), 1, 2),
        tier(Threshold::Always, 0, 1),
    ],
};

pub static OPEN_GRAPH: Rubric = Rubric {
    key: "openGraph",
    description: "Open Graph tags for social sharing",
    max: 3,
    tiers: &[tier(Threshold::Equals(1.0), 3, 3), tier(Threshold::Always, 0, 2)],
};

pub static INTERNAL_LINKS: Rubric = Rubric {
    key: "internalLinks",
    description: "Internal links to related pages",
    max: 3,
    tiers: &[
        tier(Threshold::AtLeast(5.0), 3, 3),
        tier(Threshold::AtLeast(1.0), 2, 3),
        tier(Threshold::Always, 0, 1),
    ],
};

// ── Performance (20) ────────────────────────────────────────────────────────

pub static LOAD_TIME: Rubric = Rubric {
    key: "loadTime",
    description: "Page responds in under a second",
    max: 8,
    tiers: &[
        tier(Threshold::AtMost(1000.0), 8, 8),
        tier(Threshold::AtMost(2000.0), 6, 7),
        tier(Threshold::AtMost(3000.0), 4, 6),
        tier(Threshold::AtMost(5000.0), 2, 4),
        tier(Threshold::Always, 0, 2),
    ],
};

pub static PERFORMANCE_SCORE: Rubric = Rubric {
    key: "performanceScore",
    description: "Overall performance score of 90 or more",
    max: 7,
    tiers: &[
        tier(Threshold::AtLeast(90.0), 7, 7),
        tier(Threshold::AtLeast(70.0), 5, 6),
        tier(Threshold::AtLeast(50.0), 3, 5),
        tier(Threshold::Always, 1, 3),
    ],
};

pub static LARGEST_CONTENTFUL_PAINT: Rubric = Rubric {
    key: "largestContentfulPaint",
    description: "Largest contentful paint within 2.5 seconds",
    max: 3,
    tiers: &[
        tier(Threshold::AtMost(2500.0), 3, 3),
        tier(Threshold::AtMost(4000.0), 1, 2),
        tier(Threshold::Always, 0, 1),
    ],
};

pub static LAYOUT_SHIFT: Rubric = Rubric {
    key: "layoutShift",
    description: "Cumulative layout shift of 0.1 or less",
    max: 2,
    tiers: &[
        tier(Threshold::AtMost(0.1), 2, 2),
        tier(Threshold::AtMost(0.25), 1, 2),
        tier(Threshold::Always, 0, 1),
    ],
};

/// Latency (ms) to 0–100 performance estimate when no oracle data exists.
///
/// Not a scored check; both columns are identical.
pub static LATENCY_ESTIMATE: Rubric = Rubric {
    key: "latencyEstimate",
    description: "Performance estimate from fetch latency",
    max: 100,
    tiers: &[
        tier(Threshold::AtMost(500.0), 95, 95),
        tier(Threshold::AtMost(1000.0), 90, 90),
        tier(Threshold::AtMost(2000.0), 75, 75),
        tier(Threshold::AtMost(3000.0), 60, 60),
        tier(Threshold::AtMost(5000.0), 40, 40),
        tier(Threshold::Always, 20, 20),
    ],
};

// ── Content (20) ────────────────────────────────────────────────────────────

pub static WORD_COUNT: Rubric = Rubric {
    key: "wordCount",
    description: "At least 1,000 words of body text",
    max: 7,
    tiers: &[
        tier(Threshold::AtLeast(1000.0), 7, 7),
        tier(Threshold::AtLeast(600.0), 6, 7),
        tier(Threshold::AtLeast(300.0), 4, 6),
        tier(Threshold::AtLeast(100.0), 2, 4),
        tier(Threshold::Always, 0, 2),
    ],
};

/// Value is the alt text coverage in percent.
pub static IMAGE_ALT_TEXT: Rubric = Rubric {
    key: "imageAltText",
    description: "Images carry alt text",
    max: 5,
    tiers: &[
        tier(Threshold::AtLeast(95.0), 5, 5),
        tier(Threshold::AtLeast(80.0), 4, 5),
        tier(Threshold::AtLeast(50.0), 2, 4),
        tier(Threshold::Always, 0, 2),
    ],
};

pub static CONTENT_DEPTH: Rubric = Rubric {
    key: "contentDepth",
    description: "Paragraphs and lists give the content depth",
    max: 4,
    tiers: &[
        tier(Threshold::AtLeast(10.0), 4, 4),
        tier(Threshold::AtLeast(5.0), 3, 4),
        tier(Threshold::AtLeast(1.0), 1, 3),
        tier(Threshold::Always, 0, 1),
    ],
};

pub static READABILITY: Rubric = Rubric {
    key: "readability",
    description: "Sentences are short enough to read easily",
    max: 4,
    tiers: &[
        tier(Threshold::AtLeast(70.0), 4, 4),
        tier(Threshold::AtLeast(50.0), 3, 4),
        tier(Threshold::AtLeast(30.0), 2, 3),
        tier(Threshold::Always, 1, 2),
    ],
};

// ── Mobile (10) ─────────────────────────────────────────────────────────────

pub static VIEWPORT: Rubric = Rubric {
    key: "viewport",
    description: "Viewport meta tag present",
    max: 4,
    tiers: &[tier(Threshold::Equals(1.0), 4, 4), tier(Threshold::Always, 0, 2)],
};

pub static RESPONSIVE_DESIGN: Rubric = Rubric {
    key: "responsiveDesign",
    description: "Layout adapts to small screens",
    max: 4,
    tiers: &[tier(Threshold::Equals(1.0), 4, 4), tier(Threshold::Always, 0, 2)],
};

pub static MOBILE_SCORE: Rubric = Rubric {
    key: "mobileScore",
    description: "Mobile signal score of 80 or more",
    max: 2,
    tiers: &[
        tier(Threshold::AtLeast(80.0), 2, 2),
        tier(Threshold::AtLeast(50.0), 1, 2),
        tier(Threshold::Always, 0, 1),
    ],
};

// ── Structured data (5) ─────────────────────────────────────────────────────

pub static SCHEMA_MARKUP: Rubric = Rubric {
    key: "schemaMarkup",
    description: "Schema.org blocks present",
    max: 3,
    tiers: &[
        tier(Threshold::AtLeast(2.0), 3, 3),
        tier(Threshold::Equals(1.0), 2, 3),
        tier(Threshold::Always, 0, 1),
    ],
};

/// Grades: 2 FAQ or HowTo, 1 Organization or Article, 0 neither.
pub static RICH_RESULT_TYPES: Rubric = Rubric {
    key: "richResultTypes",
    description: "Schema types eligible for rich results",
    max: 2,
    tiers: &[
        tier(Threshold::Equals(2.0), 2, 2),
        tier(Threshold::Equals(1.0), 1, 2),
        tier(Threshold::Always, 0, 0),
    ],
};

static HEADING_RUBRICS: [&Rubric; 3] = [&H1_PRESENCE, &HEADING_HIERARCHY, &SUBHEADINGS];
static TECHNICAL_RUBRICS: [&Rubric; 6] = [
    &TITLE,
    &META_DESCRIPTION,
    &CANONICAL,
    &ROBOTS,
    &OPEN_GRAPH,
    &INTERNAL_LINKS,
];
static PERFORMANCE_RUBRICS: [&Rubric; 4] = [
    &LOAD_TIME,
    &PERFORMANCE_SCORE,
    &LARGEST_CONTENTFUL_PAINT,
    &LAYOUT_SHIFT,
];
static CONTENT_RUBRICS: [&Rubric; 4] =
    [&WORD_COUNT, &IMAGE_ALT_TEXT, &CONTENT_DEPTH, &READABILITY];
static MOBILE_RUBRICS: [&Rubric; 3] = [&VIEWPORT, &RESPONSIVE_DESIGN, &MOBILE_SCORE];
static STRUCTURED_DATA_RUBRICS: [&Rubric; 2] = [&SCHEMA_MARKUP, &RICH_RESULT_TYPES];

/// Scored checks of a category, in report order.
pub fn rubrics_for(category: Category) -> &'static [&'static Rubric] {
    match category {
        Category::Heading => &HEADING_RUBRICS,
        Category::Technical => &TECHNICAL_RUBRICS,
        Category::Performance => &PERFORMANCE_RUBRICS,
        Category::Content => &CONTENT_RUBRICS,
        Category::Mobile => &MOBILE_RUBRICS,
        Category::StructuredData => &STRUCTURED_DATA_RUBRICS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_maxima_match_category_maxima() {
        for category in Category::ALL {
            let sum: u32 = rubrics_for(category).iter().map(|r| r.max).sum();
            assert_eq!(sum, category.max_score(), "{category:?}");
        }
    }

    #[test]
    fn test_tiers_never_exceed_max_and_favor_trusted() {
        for category in Category::ALL {
            for rubric in rubrics_for(category) {
                for t in rubric.tiers {
                    assert!(t.external <= rubric.max, "{}", rubric.key);
                    assert!(t.trusted <= rubric.max, "{}", rubric.key);
                    assert!(t.trusted >= t.external, "{}", rubric.key);
                }
            }
        }
    }

    #[test]
    fn test_every_rubric_ends_with_catch_all() {
        for category in Category::ALL {
            for rubric in rubrics_for(category) {
                let last = rubric.tiers.last().map(|t| t.when);
                assert_eq!(last, Some(Threshold::Always), "{}", rubric.key);
            }
        }
    }

    #[test]
    fn test_first_match_wins() {
        // 30 matches the 30-60 band before anything else.
        assert_eq!(TITLE.points(30.0, false), 7);
        assert_eq!(TITLE.points(29.0, false), 5);
        assert_eq!(TITLE.points(61.0, false), 5);
        assert_eq!(TITLE.points(71.0, false), 3);
        assert_eq!(TITLE.points(0.0, false), 0);
        assert_eq!(TITLE.tier_index(45.0), Some(0));
    }

    #[test]
    fn test_h1_presence_tiers() {
        assert_eq!(H1_PRESENCE.points(1.0, false), 8);
        assert_eq!(H1_PRESENCE.points(2.0, false), 5);
        assert_eq!(H1_PRESENCE.points(3.0, false), 2);
        assert_eq!(H1_PRESENCE.points(7.0, false), 2);
        assert_eq!(H1_PRESENCE.points(0.0, false), 0);
        assert_eq!(H1_PRESENCE.points(0.0, true), 0);
        assert_eq!(H1_PRESENCE.points(2.0, true), 6);
    }

    #[test]
    fn test_load_time_boundaries() {
        assert_eq!(LOAD_TIME.points(1000.0, false), 8);
        assert_eq!(LOAD_TIME.points(1001.0, false), 6);
        assert_eq!(LOAD_TIME.points(3000.0, false), 4);
        assert_eq!(LOAD_TIME.points(5000.0, false), 2);
        assert_eq!(LOAD_TIME.points(5001.0, false), 0);
        assert_eq!(LOAD_TIME.points(5001.0, true), 2);
    }

    #[test]
    fn test_layout_shift_fractional_boundaries() {
        assert_eq!(LAYOUT_SHIFT.points(0.1, false), 2);
        assert_eq!(LAYOUT_SHIFT.points(0.11, false), 1);
        assert_eq!(LAYOUT_SHIFT.points(0.25, false), 1);
        assert_eq!(LAYOUT_SHIFT.points(0.26, false), 0);
    }

    #[test]
    fn test_latency_estimate() {
        assert_eq!(LATENCY_ESTIMATE.points(120.0, false), 95);
        assert_eq!(LATENCY_ESTIMATE.points(2500.0, false), 60);
        assert_eq!(LATENCY_ESTIMATE.points(12_000.0, false), 20);
    }
}
