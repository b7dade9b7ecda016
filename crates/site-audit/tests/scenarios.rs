//! End-to-end runs of the synchronous pipeline over fixed pages.

use site_audit::analyzer::{analyze, analyze_fallback, ExtractionMethod, PageContext};
use site_audit::types::{AnalysisPath, Category, FetchFailure, PerformanceReport, Urgency};
use site_audit::{degraded_path, fast_path, normalize_url};
use url::Url;

fn description_140() -> String {
    "Acme builds durable industrial widgets for factories across Japan. "
        .repeat(3)
        .chars()
        .take(140)
        .collect()
}

fn well_built_page() -> String {
    let description = description_140();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Acme Widgets | Durable Industrial Parts Japan</title>
  <meta name="description" content="{description}">
  <meta name="robots" content="index, follow">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta property="og:title" content="Acme Widgets">
  <link rel="canonical" href="https://acme.example/">
  <style>@media (max-width: 640px) {{ nav {{ display: none }} }}</style>
  <script type="application/ld+json">
  {{"@context": "https://schema.org", "@type": "FAQPage", "mainEntity": []}}
  </script>
</head>
<body>
  <nav>
    <a href="/">Home</a> <a href="/products">Products</a> <a href="/about">About</a>
    <a href="/blog">Blog</a> <a href="/contact">Contact</a>
    <a href="https://partner.example.org/">Partner</a>
  </nav>
  <h1>Acme Widgets</h1>
  <h2>Products</h2>
  <p>We make widgets. They last for years. Customers trust them.</p>
  <h3>Steel widgets</h3>
  <p>Steel widgets carry heavy loads. They resist rust.</p>
  <h3>Plastic widgets</h3>
  <p>Plastic widgets are light. They cost less.</p>
  <h2>Service</h2>
  <p>We ship within two days. Support answers every call.</p>
  <ul><li>Free returns</li><li>Ten year warranty</li></ul>
  <h2>Contact</h2>
  <p>Call us today. We are happy to help.</p>
  <img src="/steel.jpg" alt="Steel widget" width="640" height="480">
  <img src="/plastic.jpg" alt="Plastic widget" width="640" height="480">
</body>
</html>"#
    )
}

/// Markup served from the requested address without redirects.
fn served_at(url: &Url) -> PageContext<'_> {
    PageContext {
        url: url.as_str(),
        load_time_ms: 800,
    }
}

const BARE_PAGE: &str = "<html><body><div>Hello world</div><p>Just a line of text.</p></body></html>";

#[test]
fn test_well_built_page_scores_high() {
    let url = normalize_url("https://acme.example/").unwrap();
    let result = fast_path(&url, &well_built_page(), served_at(&url), None, false).unwrap();

    assert_eq!(result.path, AnalysisPath::Fast);
    assert_eq!(result.facts.technical.title_length, 45);
    assert_eq!(result.facts.technical.description_length, 140);
    assert_eq!(result.facts.heading_structure.h1_count, 1);
    assert!(result.facts.heading_structure.hierarchy_valid);
    assert!(result.facts.structured_data.has_faq);

    let b = &result.score_breakdown;
    assert!(b.heading.score >= 18, "heading {}", b.heading.score);
    assert!(b.technical.score >= 22, "technical {}", b.technical.score);
    assert!(b.structured_data.score > 0);
    assert!(
        (70..=100).contains(&result.overall_score),
        "overall {}",
        result.overall_score
    );
    assert!(b.validate().is_ok());
}

#[test]
fn test_bare_page_scores_low_and_leads_with_headings() {
    let url = normalize_url("https://bare.example/").unwrap();
    let result = fast_path(&url, BARE_PAGE, served_at(&url), None, false).unwrap();

    let b = &result.score_breakdown;
    assert_eq!(b.heading.score, 0);
    assert!(b.technical.score <= 2, "technical {}", b.technical.score);
    assert_eq!(b.mobile.score, 0);
    assert_eq!(b.structured_data.score, 0);
    assert!(result.overall_score < 60, "overall {}", result.overall_score);
    assert_eq!(result.urgency(), Urgency::High);
    assert!(result.recommendations[0].contains("H1"));
}

#[test]
fn test_fast_path_blends_oracle_score() {
    let url = normalize_url("https://acme.example/").unwrap();
    let page = well_built_page();
    let base = fast_path(&url, &page, served_at(&url), None, false).unwrap().overall_score;

    let report = PerformanceReport {
        score: 0.92,
        first_contentful_paint_ms: 700.0,
        largest_contentful_paint_ms: 1500.0,
        cumulative_layout_shift: 0.01,
        speed_index_ms: 1100.0,
    };
    let blended = fast_path(&url, &page, served_at(&url), Some(&report), false).unwrap();
    // The oracle's figures keep the performance category at full marks, so
    // the base is unchanged and only the blend moves the score.
    assert_eq!(blended.score_breakdown.performance.score, 20);
    let expected = (f64::from(base) * 0.75 + 92.0 * 0.25).round() as u8;
    assert_eq!(blended.overall_score, expected);
    assert_eq!(blended.facts.performance.oracle_score(), Some(92));
}

#[test]
fn test_trusted_page_gets_bonus_and_no_criticism() {
    let url = normalize_url("https://bare.example/").unwrap();
    let external = fast_path(&url, BARE_PAGE, served_at(&url), None, false).unwrap();
    let trusted = fast_path(&url, BARE_PAGE, served_at(&url), None, true).unwrap();
    assert!(trusted.overall_score >= external.overall_score + 15);
    assert!(trusted.recommendations.iter().all(|r| !r.contains("Add")));
}

#[test]
fn test_links_are_classified_against_the_served_address() {
    let page = r#"<html><body>
      <a href="https://shop.example/a">A</a> <a href="https://shop.example/b">B</a>
      <a href="https://www.shop.example/c">C</a> <a href="/d">D</a>
      <a href="https://old-shop.example/e">E</a>
    </body></html>"#;
    let requested = normalize_url("https://old-shop.example/").unwrap();
    let served = PageContext {
        url: "https://shop.example/",
        load_time_ms: 800,
    };

    let result = fast_path(&requested, page, served, None, false).unwrap();
    assert_eq!(result.url, "https://old-shop.example/");
    assert_eq!(result.facts.technical.internal_links, 4);
    assert_eq!(result.facts.technical.external_links, 1);
}

#[test]
fn test_degraded_path_is_complete() {
    let url = normalize_url("example.com").unwrap();
    let result = degraded_path(&url, false, FetchFailure::Timeout, 5000, None).unwrap();
    assert_eq!(result.path, AnalysisPath::Degraded);
    assert!(!result.facts.heading_structure.missing_h1);
    assert!((40..=80).contains(&result.overall_score));
    assert!(!result.recommendations.is_empty());
    for category in Category::ALL {
        assert_eq!(result.score_breakdown.get(category).max_score, category.max_score());
    }
}

#[test]
fn test_both_extractors_agree_on_clean_markup() {
    let page = well_built_page();
    let ctx = PageContext {
        url: "https://acme.example/",
        load_time_ms: 800,
    };
    let dom = analyze(&page, &ctx);
    let regex = analyze_fallback(&page, &ctx);

    assert_eq!(dom.method, ExtractionMethod::Dom);
    assert_eq!(regex.method, ExtractionMethod::Regex);
    assert_eq!(dom.title, regex.title);
    assert_eq!(dom.description, regex.description);
    assert_eq!(dom.summary.heading_structure, regex.summary.heading_structure);
    assert_eq!(dom.summary.technical, regex.summary.technical);
    assert_eq!(dom.summary.mobile, regex.summary.mobile);
    assert_eq!(dom.summary.structured_data, regex.summary.structured_data);
    assert_eq!(dom.summary.content.image_count, regex.summary.content.image_count);
    assert_eq!(dom.summary.content.content_depth, regex.summary.content.content_depth);
    assert_eq!(dom.summary.content.word_count, regex.summary.content.word_count);
}
