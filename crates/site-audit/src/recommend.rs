//! Recommendation generator.
//!
//! Deficiencies are the checks that did not earn full external points, so
//! the advice always agrees with the score breakdown. Messages come out in
//! category order: headings, technical metadata, performance, content,
//! mobile, structured data.

use crate::rubric::{self, flag, Rubric};
use crate::scorer::rich_result_grade;
use crate::types::{FactualSummary, RobotsDirective};

/// Oracle scores below this trigger the urgent message.
pub const URGENT_ORACLE_SCORE: u8 = 70;

pub const CONSULTATION: &str =
    "A professional SEO consultation can turn these findings into a prioritized action plan.";

const AFFIRMATIONS: &[&str] = &[
    "Heading structure and metadata follow current search best practice.",
    "Performance and mobile experience are at a competitive level.",
    "Structured data gives search engines a clear picture of the organization.",
    "Keep publishing in-depth content to build on this foundation.",
];

fn falls_short(rubric: &Rubric, value: f64) -> bool {
    rubric.points(value, false) < rubric.max
}

/// Urgent message for a low oracle score.
pub fn oracle_alert(score: u8) -> String {
    format!(
        "URGENT: measured page speed score is {score}/100. Slow pages lose visitors and rankings; \
         make performance the first fix."
    )
}

/// Affirming statements used for the trusted site.
pub fn affirmations() -> Vec<String> {
    AFFIRMATIONS.iter().map(|s| s.to_string()).collect()
}

/// Ordered recommendations for a summary.
///
/// The trusted site only ever gets [`affirmations`]. External sites get
/// one message per deficiency, the oracle alert first when it applies, and
/// [`CONSULTATION`] last when anything was found.
pub fn recommend(summary: &FactualSummary, trusted: bool) -> Vec<String> {
    if trusted {
        return affirmations();
    }

    let mut out = Vec::new();
    heading_advice(summary, &mut out);
    technical_advice(summary, &mut out);
    performance_advice(summary, &mut out);
    content_advice(summary, &mut out);
    mobile_advice(summary, &mut out);
    structured_data_advice(summary, &mut out);

    if let Some(score) = summary.performance.oracle_score() {
        if score < URGENT_ORACLE_SCORE {
            out.insert(0, oracle_alert(score));
        }
    }

    if out.is_empty() {
        out.push("No significant issues found. Re-check after major content or template changes.".to_string());
    } else {
        out.push(CONSULTATION.to_string());
    }
    out
}

fn heading_advice(s: &FactualSummary, out: &mut Vec<String>) {
    let h = &s.heading_structure;
    if h.missing_h1 {
        out.push("Add one H1 heading that states the page's main topic.".to_string());
    } else if h.h1_count > 1 {
        out.push(format!(
            "Use a single H1 heading; {} were found. Demote the others to H2.",
            h.h1_count
        ));
    }
    if h.total() > 0 && !h.hierarchy_valid {
        out.push("Fix the heading hierarchy so levels never skip (e.g. H2 straight to H4).".to_string());
    }
    if falls_short(&rubric::SUBHEADINGS, f64::from(h.subheading_count())) {
        out.push("Break the content into sections with H2 and H3 subheadings.".to_string());
    }
}

fn technical_advice(s: &FactualSummary, out: &mut Vec<String>) {
    let t = &s.technical;
    if !t.has_title {
        out.push("Add a <title> tag of 30 to 60 characters.".to_string());
    } else if falls_short(&rubric::TITLE, f64::from(t.title_length)) {
        out.push(format!(
            "Adjust the title to 30 to 60 characters (currently {}).",
            t.title_length
        ));
    }
    if !t.has_description {
        out.push("Add a meta description of 120 to 160 characters.".to_string());
    } else if falls_short(&rubric::META_DESCRIPTION, f64::from(t.description_length)) {
        out.push(format!(
            "Adjust the meta description to 120 to 160 characters (currently {}).",
            t.description_length
        ));
    }
    if falls_short(&rubric::CANONICAL, flag(t.has_canonical)) {
        out.push("Add a canonical link to consolidate duplicate URLs.".to_string());
    }
    match t.robots {
        RobotsDirective::NoIndex => out.push(
            "Remove the noindex robots directive if this page should appear in search results."
                .to_string(),
        ),
        RobotsDirective::Missing => {
            out.push("Declare an explicit robots meta directive (index, follow).".to_string())
        }
        RobotsDirective::Indexable => {}
    }
    if falls_short(&rubric::OPEN_GRAPH, flag(t.has_open_graph)) {
        out.push("Add Open Graph tags so shared links render rich previews.".to_string());
    }
    if falls_short(&rubric::INTERNAL_LINKS, f64::from(t.internal_links)) {
        out.push(format!(
            "Link to at least five related pages on the same site (found {}).",
            t.internal_links
        ));
    }
}

fn performance_advice(s: &FactualSummary, out: &mut Vec<String>) {
    let p = &s.performance;
    if falls_short(&rubric::LOAD_TIME, p.load_time_ms as f64) {
        out.push(format!(
            "Cut the page response time below one second (measured {} ms).",
            p.load_time_ms
        ));
    }
    if p.oracle_score().is_none() && falls_short(&rubric::PERFORMANCE_SCORE, f64::from(p.performance_score)) {
        out.push(format!(
            "Improve overall page speed (estimated score {}/100).",
            p.performance_score
        ));
    }
    if falls_short(&rubric::LARGEST_CONTENTFUL_PAINT, p.largest_contentful_paint_ms as f64) {
        out.push(format!(
            "Bring Largest Contentful Paint under 2.5 s (currently {} ms) by compressing hero images and deferring scripts.",
            p.largest_contentful_paint_ms
        ));
    }
    if falls_short(&rubric::LAYOUT_SHIFT, p.cumulative_layout_shift) {
        out.push(format!(
            "Give images and embeds explicit width and height to reduce layout shift (CLS {:.2}).",
            p.cumulative_layout_shift
        ));
    }
}

fn content_advice(s: &FactualSummary, out: &mut Vec<String>) {
    let c = &s.content;
    if falls_short(&rubric::WORD_COUNT, f64::from(c.word_count)) {
        out.push(format!(
            "Expand the main content toward 1,000 words of useful detail (currently {}).",
            c.word_count
        ));
    }
    let coverage_pct = (c.alt_text_coverage * 100.0).clamp(0.0, 100.0);
    if c.image_count > 0 && falls_short(&rubric::IMAGE_ALT_TEXT, coverage_pct) {
        out.push(format!(
            "Write descriptive alt text for every image ({coverage_pct:.0}% covered)."
        ));
    }
    if falls_short(&rubric::CONTENT_DEPTH, f64::from(c.content_depth)) {
        out.push("Organize the content into more paragraphs and lists.".to_string());
    }
    if c.word_count > 0 && falls_short(&rubric::READABILITY, f64::from(c.readability)) {
        out.push("Shorten long sentences to make the text easier to read.".to_string());
    }
}

fn mobile_advice(s: &FactualSummary, out: &mut Vec<String>) {
    let m = &s.mobile;
    if !m.has_viewport {
        out.push("Add a viewport meta tag (width=device-width, initial-scale=1).".to_string());
    }
    if !m.is_responsive {
        out.push("Adopt a responsive layout with media queries or a responsive CSS framework.".to_string());
    }
}

fn structured_data_advice(s: &FactualSummary, out: &mut Vec<String>) {
    let d = &s.structured_data;
    if d.schema_count == 0 {
        out.push("Add schema.org structured data as JSON-LD.".to_string());
    }
    if falls_short(&rubric::RICH_RESULT_TYPES, rich_result_grade(d)) {
        out.push("Mark up FAQ or HowTo content to qualify for rich results.".to_string());
    }
}
