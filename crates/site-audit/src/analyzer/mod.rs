//! Markup analyzer: raw HTML in, six factual summaries out.
//!
//! The primary path parses the markup with `scraper` and walks the tree.
//! When that is not possible (the parser panics, or the document is too
//! large to build a tree for) the same signals are pulled out of the raw
//! text with regular expressions. Both paths fill one [`PageSignals`]
//! record and share every derivation after that, so the output shape is
//! identical whichever path ran.

pub mod dom;
pub mod headings;
pub mod mobile;
pub mod regex_scan;
pub mod text;

use crate::rubric::LATENCY_ESTIMATE;
use crate::types::{
    ContentFacts, FactualSummary, MetricSource, PerformanceFacts, RobotsDirective,
    StructuredDataFacts, TechnicalFacts,
};
use mobile::MobileInputs;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use tracing::{debug, warn};

/// Documents larger than this skip tree construction.
pub const MAX_DOM_BYTES: usize = 5 * 1024 * 1024;

/// Layout shift attributed to each image without explicit dimensions.
const SHIFT_PER_UNSIZED_IMAGE: f64 = 0.02;
const MAX_ESTIMATED_SHIFT: f64 = 0.5;

/// What the analyzer knows about the page besides its markup.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// URL the markup was fetched from; used to split internal and external links.
    pub url: &'a str,
    /// Measured fetch latency.
    pub load_time_ms: u64,
}

/// Which extractor produced the signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    Dom,
    Regex,
}

/// Analyzer output: page identity plus the factual summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PageAnalysis {
    pub title: String,
    pub description: String,
    pub summary: FactualSummary,
    pub method: ExtractionMethod,
}

/// Raw signals gathered by either extractor.
#[derive(Debug, Default, Clone)]
pub struct PageSignals {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `(level, text)` in document order.
    pub headings: Vec<(u8, String)>,
    pub has_canonical: bool,
    pub robots: Option<String>,
    pub has_open_graph: bool,
    pub has_viewport: bool,
    /// Raw text of each `application/ld+json` script.
    pub jsonld_blocks: Vec<String>,
    /// `itemtype` attribute values.
    pub microdata_types: Vec<String>,
    pub hrefs: Vec<String>,
    pub body_text: String,
    pub image_count: u32,
    pub images_with_alt: u32,
    pub images_without_dimensions: u32,
    pub paragraph_count: u32,
    pub list_count: u32,
    pub style_text: String,
    pub media_attribute: bool,
    pub class_names: String,
}

/// Analyze fetched markup.
///
/// Never fails: a parser panic or an oversized document falls back to
/// [`analyze_fallback`].
pub fn analyze(markup: &str, ctx: &PageContext<'_>) -> PageAnalysis {
    if markup.len() > MAX_DOM_BYTES {
        warn!(
            bytes = markup.len(),
            "markup exceeds DOM limit, using regex extraction"
        );
        return analyze_fallback(markup, ctx);
    }

    match std::panic::catch_unwind(AssertUnwindSafe(|| dom::extract(markup))) {
        Ok(signals) => summarize(signals, markup, ctx, ExtractionMethod::Dom),
        Err(panic_info) => {
            let msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            warn!(url = ctx.url, "DOM extraction panicked ({msg}), using regex extraction");
            analyze_fallback(markup, ctx)
        }
    }
}

/// Analyze markup with the regex extractor only.
pub fn analyze_fallback(markup: &str, ctx: &PageContext<'_>) -> PageAnalysis {
    let signals = regex_scan::extract(markup);
    summarize(signals, markup, ctx, ExtractionMethod::Regex)
}

fn summarize(
    signals: PageSignals,
    markup: &str,
    ctx: &PageContext<'_>,
    method: ExtractionMethod,
) -> PageAnalysis {
    let title = signals
        .title
        .as_deref()
        .map(text::normalize_whitespace)
        .unwrap_or_default();
    let description = signals
        .description
        .as_deref()
        .map(text::normalize_whitespace)
        .unwrap_or_default();

    let structured_data =
        structured_data_facts(&signals.jsonld_blocks, &signals.microdata_types);
    let (internal_links, external_links) = count_links(&signals.hrefs, ctx.url);

    let technical = TechnicalFacts {
        has_title: !title.is_empty(),
        title_length: title.chars().count() as u32,
        has_description: !description.is_empty(),
        description_length: description.chars().count() as u32,
        has_canonical: signals.has_canonical,
        robots: RobotsDirective::from_content(signals.robots.as_deref()),
        has_open_graph: signals.has_open_graph,
        has_structured_data: structured_data.schema_count > 0,
        internal_links,
        external_links,
    };

    let word_count = text::word_count(&signals.body_text);
    let content = ContentFacts {
        word_count,
        image_count: signals.image_count,
        text_to_image_ratio: if signals.image_count == 0 {
            f64::from(word_count)
        } else {
            f64::from(word_count) / f64::from(signals.image_count)
        },
        alt_text_coverage: if signals.image_count == 0 {
            1.0
        } else {
            f64::from(signals.images_with_alt) / f64::from(signals.image_count)
        },
        content_depth: signals.paragraph_count + signals.list_count,
        readability: text::readability(&signals.body_text),
    };

    let mobile = mobile::mobile_facts(&MobileInputs {
        has_viewport: signals.has_viewport,
        style_text: &signals.style_text,
        media_attribute: signals.media_attribute,
        markup,
        class_names: &signals.class_names,
    });

    let summary = FactualSummary {
        heading_structure: headings::heading_facts(&signals.headings),
        technical,
        performance: estimate_performance(ctx.load_time_ms, signals.images_without_dimensions),
        content,
        mobile,
        structured_data,
    };

    debug!(
        url = ctx.url,
        ?method,
        words = word_count,
        schemas = summary.structured_data.schema_count,
        "page analyzed"
    );

    PageAnalysis {
        title,
        description,
        summary,
        method,
    }
}

/// Performance figures estimated from latency when no oracle data exists.
pub fn estimate_performance(load_time_ms: u64, images_without_dimensions: u32) -> PerformanceFacts {
    let load = load_time_ms as f64;
    let fcp = (load * 0.6).round() as u64 + 300;
    let lcp = load_time_ms + 800;
    PerformanceFacts {
        load_time_ms,
        performance_score: LATENCY_ESTIMATE.points(load, false) as u8,
        first_contentful_paint_ms: fcp,
        largest_contentful_paint_ms: lcp,
        cumulative_layout_shift: (f64::from(images_without_dimensions) * SHIFT_PER_UNSIZED_IMAGE)
            .min(MAX_ESTIMATED_SHIFT),
        speed_index_ms: (fcp + lcp) / 2,
        source: MetricSource::Estimated,
    }
}

/// Split hrefs into internal and external counts relative to `base_url`.
///
/// Fragments and `javascript:`, `mailto:`, `tel:` links are ignored.
pub fn count_links(hrefs: &[String], base_url: &str) -> (u32, u32) {
    let base = url::Url::parse(base_url).ok();
    let base_host = base
        .as_ref()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()));

    let mut internal = 0u32;
    let mut external = 0u32;
    for href in hrefs {
        let href = href.trim();
        let lower = href.to_ascii_lowercase();
        if href.is_empty()
            || href.starts_with('#')
            || lower.starts_with("javascript:")
            || lower.starts_with("mailto:")
            || lower.starts_with("tel:")
        {
            continue;
        }

        let resolved = match base.as_ref() {
            Some(b) => b.join(href).ok(),
            None => url::Url::parse(href).ok(),
        };
        let is_internal = match (&base_host, resolved.as_ref().and_then(|u| u.host_str())) {
            (Some(bh), Some(h)) => {
                let h = h.to_ascii_lowercase();
                h == *bh
                    || h.strip_prefix("www.").unwrap_or(&h)
                        == bh.strip_prefix("www.").unwrap_or(bh)
            }
            _ => href.starts_with('/'),
        };
        if is_internal {
            internal += 1;
        } else {
            external += 1;
        }
    }
    (internal, external)
}

/// Collect `@type` names from a JSON-LD value, following arrays and `@graph`.
fn collect_types(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_types(item, out);
            }
        }
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => out.push(schema_name(t).to_string()),
                Some(Value::Array(types)) => {
                    out.extend(
                        types
                            .iter()
                            .filter_map(|t| t.as_str())
                            .map(|t| schema_name(t).to_string()),
                    );
                }
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types(graph, out);
            }
            if let Some(entity) = map.get("mainEntity") {
                collect_types(entity, out);
            }
        }
        _ => {}
    }
}

/// `https://schema.org/FAQPage` and `schema:FAQPage` both become `FAQPage`.
fn schema_name(t: &str) -> &str {
    t.rsplit(['/', ':']).next().unwrap_or(t).trim()
}

const ORGANIZATION_TYPES: &[&str] = &[
    "Organization",
    "Corporation",
    "LocalBusiness",
    "ProfessionalService",
    "EducationalOrganization",
    "NGO",
    "OnlineBusiness",
];

const ARTICLE_TYPES: &[&str] = &[
    "Article",
    "NewsArticle",
    "BlogPosting",
    "TechArticle",
    "ScholarlyArticle",
    "Report",
];

/// Inventory of schema blocks. Malformed JSON-LD blocks are not counted.
pub fn structured_data_facts(jsonld_blocks: &[String], microdata_types: &[String]) -> StructuredDataFacts {
    let mut types = Vec::new();
    let mut schema_count = 0u32;
    for block in jsonld_blocks {
        match serde_json::from_str::<Value>(block.trim()) {
            Ok(value) => {
                schema_count += 1;
                collect_types(&value, &mut types);
            }
            Err(e) => debug!("skipping malformed JSON-LD block: {e}"),
        }
    }
    for itemtype in microdata_types {
        schema_count += 1;
        types.extend(
            itemtype
                .split_whitespace()
                .map(|t| schema_name(t).to_string()),
        );
    }

    let has = |names: &[&str]| types.iter().any(|t| names.contains(&t.as_str()));
    StructuredDataFacts {
        has_faq: has(&["FAQPage"]),
        has_how_to: has(&["HowTo"]),
        has_organization: has(ORGANIZATION_TYPES),
        has_article: has(ARTICLE_TYPES),
        schema_count,
    }
}
