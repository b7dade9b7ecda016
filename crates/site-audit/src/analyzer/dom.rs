//! Signal extraction over a parsed DOM.

use super::text::normalize_whitespace;
use super::PageSignals;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never counts as visible content.
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn element_text(el: &ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Parse `markup` and gather every signal the summarizer needs.
pub fn extract(markup: &str) -> PageSignals {
    let document = Html::parse_document(markup);
    let mut signals = PageSignals::default();

    extract_head(&document, &mut signals);
    extract_headings(&document, &mut signals);
    extract_schema(&document, &mut signals);
    extract_body(&document, &mut signals);

    signals
}

// ── Head ────────────────────────────────────────────────────────────────────

fn extract_head(document: &Html, signals: &mut PageSignals) {
    if let Some(title) = document.select(&selector("title")).next() {
        signals.title = Some(element_text(&title));
    }

    for meta in document.select(&selector("meta")) {
        let el = meta.value();
        let content = el.attr("content").map(str::trim);
        if let Some(name) = el.attr("name") {
            match name.trim().to_ascii_lowercase().as_str() {
                "description" => {
                    if signals.description.is_none() {
                        signals.description = content.map(str::to_string);
                    }
                }
                "robots" => {
                    if signals.robots.is_none() {
                        signals.robots = content.map(str::to_string);
                    }
                }
                "viewport" => signals.has_viewport = true,
                _ => {}
            }
        }
        if let Some(property) = el.attr("property") {
            if property.trim().to_ascii_lowercase().starts_with("og:") {
                signals.has_open_graph = true;
            }
        }
    }

    for link in document.select(&selector("link[rel]")) {
        let el = link.value();
        let is_canonical = el
            .attr("rel")
            .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")));
        if is_canonical && el.attr("href").is_some_and(|h| !h.trim().is_empty()) {
            signals.has_canonical = true;
        }
    }

    signals.media_attribute = document
        .select(&selector("link[media]"))
        .filter_map(|l| l.value().attr("media"))
        .any(|m| m.to_ascii_lowercase().contains("width"));

    let styles: Vec<String> = document
        .select(&selector("style"))
        .map(|s| s.text().collect::<String>())
        .collect();
    signals.style_text = styles.join("\n");
}

// ── Headings ────────────────────────────────────────────────────────────────

fn extract_headings(document: &Html, signals: &mut PageSignals) {
    for el in document.select(&selector("h1, h2, h3, h4, h5, h6")) {
        let level = el.value().name()[1..].parse::<u8>().unwrap_or(6);
        signals.headings.push((level, element_text(&el)));
    }
}

// ── Structured data ─────────────────────────────────────────────────────────

fn extract_schema(document: &Html, signals: &mut PageSignals) {
    for script in document.select(&selector("script[type]")) {
        let is_jsonld = script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_jsonld {
            continue;
        }
        let text = script.inner_html();
        if !text.trim().is_empty() {
            signals.jsonld_blocks.push(text);
        }
    }

    signals.microdata_types = document
        .select(&selector("[itemtype]"))
        .filter_map(|el| el.value().attr("itemtype"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
}

// ── Body ────────────────────────────────────────────────────────────────────

fn extract_body(document: &Html, signals: &mut PageSignals) {
    signals.hrefs = document
        .select(&selector("a[href]"))
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();

    for img in document.select(&selector("img")) {
        let el = img.value();
        signals.image_count += 1;
        if el.attr("alt").is_some_and(|a| !a.trim().is_empty()) {
            signals.images_with_alt += 1;
        }
        if el.attr("width").is_none() || el.attr("height").is_none() {
            signals.images_without_dimensions += 1;
        }
    }

    signals.paragraph_count = document
        .select(&selector("p"))
        .filter(|p| p.text().any(|t| !t.trim().is_empty()))
        .count() as u32;
    signals.list_count = document.select(&selector("ul, ol")).count() as u32;

    let classes: Vec<&str> = document
        .select(&selector("[class]"))
        .filter_map(|el| el.value().attr("class"))
        .collect();
    signals.class_names = classes.join(" ");

    let mut chunks = Vec::new();
    if let Some(body) = document.select(&selector("body")).next() {
        for node in body.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| INVISIBLE.contains(&e.name()))
            });
            if !hidden && !text.trim().is_empty() {
                chunks.push(text.trim().to_string());
            }
        }
    }
    signals.body_text = chunks.join(" ");
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>  Acme   Widgets </title>
  <meta name="Description" content="Widgets for every need.">
  <meta name="robots" content="index, follow">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta property="og:title" content="Acme">
  <link rel="canonical" href="https://acme.test/">
  <style>@media (max-width: 600px) { h1 { font-size: 1.5em } }</style>
  <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
</head>
<body class="home">
  <h1>Acme Widgets</h1>
  <h2>Why <em>us</em></h2>
  <p>We build widgets.</p>
  <p>   </p>
  <ul><li>Fast</li><li>Cheap</li></ul>
  <img src="a.png" alt="A widget" width="10" height="10">
  <img src="b.png">
  <a href="/about">About</a>
  <script>var hidden = "not content";</script>
</body>
</html>"#;

    #[test]
    fn test_extract_head_signals() {
        let s = extract(PAGE);
        assert_eq!(s.title.as_deref(), Some("Acme Widgets"));
        assert_eq!(s.description.as_deref(), Some("Widgets for every need."));
        assert_eq!(s.robots.as_deref(), Some("index, follow"));
        assert!(s.has_viewport);
        assert!(s.has_open_graph);
        assert!(s.has_canonical);
        assert!(s.style_text.contains("@media"));
        assert_eq!(s.jsonld_blocks.len(), 1);
    }

    #[test]
    fn test_extract_headings_in_order() {
        let s = extract(PAGE);
        assert_eq!(
            s.headings,
            vec![(1, "Acme Widgets".to_string()), (2, "Why us".to_string())]
        );
    }

    #[test]
    fn test_extract_body_signals() {
        let s = extract(PAGE);
        assert_eq!(s.image_count, 2);
        assert_eq!(s.images_with_alt, 1);
        assert_eq!(s.images_without_dimensions, 1);
        assert_eq!(s.paragraph_count, 1);
        assert_eq!(s.list_count, 1);
        assert_eq!(s.hrefs, vec!["/about".to_string()]);
        assert!(s.body_text.contains("We build widgets."));
        assert!(!s.body_text.contains("not content"));
    }

    #[test]
    fn test_malformed_markup_still_extracts() {
        let s = extract("<h1>Unclosed <h2>Nested<p>text");
        assert_eq!(s.headings.len(), 2);
        assert_eq!(s.headings[0].0, 1);
    }
}
