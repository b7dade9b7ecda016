//! Signal extraction over raw markup, for documents the DOM path cannot take.
//!
//! Each pattern mirrors one selector in [`super::dom`]. The scan is
//! tolerant of unclosed tags and odd quoting, at the cost of missing
//! content the tree builder would have repaired.

use super::text::normalize_whitespace;
use super::PageSignals;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("extraction regex is valid"))
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            cached(&RE, $re)
        }
    };
}

pattern!(title_re, r"(?is)<title\b[^>]*>(.*?)</title\s*>");
pattern!(meta_re, r"(?is)<meta\b[^>]*>");
pattern!(link_re, r"(?is)<link\b[^>]*>");
pattern!(anchor_re, r"(?is)<a\b[^>]*>");
pattern!(img_re, r"(?is)<img\b[^>]*>");
pattern!(heading_re, r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>");
pattern!(script_re, r"(?is)<script\b([^>]*)>(.*?)</script\s*>");
pattern!(style_re, r"(?is)<style\b[^>]*>(.*?)</style\s*>");
pattern!(paragraph_re, r"(?is)<p\b[^>]*>(.*?)</p\s*>");
pattern!(list_re, r"(?i)<(?:ul|ol)\b");
pattern!(body_re, r"(?is)<body\b[^>]*>(.*)</body\s*>");
pattern!(
    invisible_re,
    r"(?is)<(?:script|style|noscript|template)\b[^>]*>.*?</(?:script|style|noscript|template)\s*>"
);
pattern!(comment_re, r"(?s)<!--.*?-->");
pattern!(tag_re, r"(?s)<[^>]*>");
pattern!(
    attr_re,
    r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#
);
pattern!(itemtype_re, r#"(?i)\sitemtype\s*=\s*(?:"([^"]*)"|'([^']*)')"#);
pattern!(class_re, r#"(?i)\sclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#);
pattern!(entity_re, r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);");

/// Value of attribute `name` in a single start tag, entity-decoded.
fn attr(tag: &str, name: &str) -> Option<String> {
    attr_re().captures_iter(tag).find_map(|c| {
        if !c[1].eq_ignore_ascii_case(name) {
            return None;
        }
        c.get(2)
            .or_else(|| c.get(3))
            .or_else(|| c.get(4))
            .map(|m| decode_entities(m.as_str()))
    })
}

fn has_attr(tag: &str, name: &str) -> bool {
    attr(tag, name).is_some()
}

fn first_group(c: &Captures<'_>) -> String {
    c.get(1)
        .or_else(|| c.get(2))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Decode the common named entities and all numeric references.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    entity_re()
        .replace_all(text, |c: &Captures<'_>| {
            let entity = &c[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    "mdash" => Some('\u{2014}'),
                    "ndash" => Some('\u{2013}'),
                    "hellip" => Some('\u{2026}'),
                    "copy" => Some('\u{a9}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| c[0].to_string(), |ch| ch.to_string())
        })
        .into_owned()
}

/// Replace tags with spaces, decode entities, collapse whitespace.
fn visible_text(fragment: &str) -> String {
    let without_tags = tag_re().replace_all(fragment, " ");
    normalize_whitespace(&decode_entities(&without_tags))
}

/// Scan `markup` and gather every signal the summarizer needs.
pub fn extract(markup: &str) -> PageSignals {
    let mut signals = PageSignals::default();
    let markup_no_comments = comment_re().replace_all(markup, "");
    let markup: &str = &markup_no_comments;

    // Head
    signals.title = title_re().captures(markup).map(|c| visible_text(&c[1]));

    for m in meta_re().find_iter(markup) {
        let tag = m.as_str();
        let content = attr(tag, "content").map(|c| c.trim().to_string());
        if let Some(name) = attr(tag, "name") {
            match name.trim().to_ascii_lowercase().as_str() {
                "description" if signals.description.is_none() => signals.description = content,
                "robots" if signals.robots.is_none() => signals.robots = content,
                "viewport" => signals.has_viewport = true,
                _ => {}
            }
        }
        if attr(tag, "property").is_some_and(|p| p.trim().to_ascii_lowercase().starts_with("og:")) {
            signals.has_open_graph = true;
        }
    }

    for m in link_re().find_iter(markup) {
        let tag = m.as_str();
        let is_canonical = attr(tag, "rel")
            .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")));
        if is_canonical && attr(tag, "href").is_some_and(|h| !h.trim().is_empty()) {
            signals.has_canonical = true;
        }
        if attr(tag, "media").is_some_and(|media| media.to_ascii_lowercase().contains("width")) {
            signals.media_attribute = true;
        }
    }

    let styles: Vec<&str> = style_re()
        .captures_iter(markup)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    signals.style_text = styles.join("\n");

    // Headings
    for c in heading_re().captures_iter(markup) {
        let level = c[1].parse::<u8>().unwrap_or(6);
        signals.headings.push((level, visible_text(&c[2])));
    }

    // Structured data
    for c in script_re().captures_iter(markup) {
        let is_jsonld = attr(&c[1], "type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if is_jsonld && !c[2].trim().is_empty() {
            signals.jsonld_blocks.push(c[2].to_string());
        }
    }
    signals.microdata_types = itemtype_re()
        .captures_iter(markup)
        .map(|c| first_group(&c).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    // Body
    signals.hrefs = anchor_re()
        .find_iter(markup)
        .filter_map(|m| attr(m.as_str(), "href"))
        .collect();

    for m in img_re().find_iter(markup) {
        let tag = m.as_str();
        signals.image_count += 1;
        if attr(tag, "alt").is_some_and(|a| !a.trim().is_empty()) {
            signals.images_with_alt += 1;
        }
        if !has_attr(tag, "width") || !has_attr(tag, "height") {
            signals.images_without_dimensions += 1;
        }
    }

    signals.paragraph_count = paragraph_re()
        .captures_iter(markup)
        .filter(|c| !visible_text(&c[1]).is_empty())
        .count() as u32;
    signals.list_count = list_re().find_iter(markup).count() as u32;

    let classes: Vec<String> = class_re().captures_iter(markup).map(|c| first_group(&c)).collect();
    signals.class_names = classes.join(" ");

    let body = body_re()
        .captures(markup)
        .and_then(|c| c.get(1))
        .map_or(markup, |m| m.as_str());
    signals.body_text = visible_text(&invisible_re().replace_all(body, " "));

    signals
}
