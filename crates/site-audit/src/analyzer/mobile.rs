//! Multi-signal responsive-design heuristic.

use crate::types::MobileFacts;
use regex::Regex;
use std::sync::OnceLock;

/// Name fragments of CSS frameworks that ship a responsive grid.
pub const FRAMEWORK_FINGERPRINTS: &[&str] = &[
    "bootstrap",
    "tailwind",
    "bulma",
    "materialize",
    "foundation.min.css",
    "foundation.css",
    "uikit",
    "semantic.min.css",
    "pure-min.css",
];

const VIEWPORT_POINTS: u32 = 40;
const MEDIA_QUERY_POINTS: u32 = 25;
const FRAMEWORK_POINTS: u32 = 20;
const RESPONSIVE_CLASS_POINTS: u32 = 15;

fn responsive_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:^|\s)(?:sm|md|lg|xl|2xl):[A-Za-z\[-]|\bcol-(?:xs|sm|md|lg|xl|xxl)-\d{1,2}\b|\b(?:d|hidden|visible)-(?:xs|sm|md|lg|xl)(?:-[a-z]+)?\b",
        )
        .expect("responsive class regex is valid")
    })
}

/// Raw inputs to the heuristic, gathered by either extraction path.
#[derive(Debug, Default)]
pub struct MobileInputs<'a> {
    pub has_viewport: bool,
    /// Contents of inline `<style>` blocks.
    pub style_text: &'a str,
    /// Whether any `<link>` carries a width-based `media` attribute.
    pub media_attribute: bool,
    /// Whole markup, searched for framework fingerprints.
    pub markup: &'a str,
    /// Space-joined `class` attribute values.
    pub class_names: &'a str,
}

pub fn has_media_queries(style_text: &str) -> bool {
    style_text.to_ascii_lowercase().contains("@media")
}

pub fn detect_framework(markup: &str) -> bool {
    let lower = markup.to_ascii_lowercase();
    FRAMEWORK_FINGERPRINTS.iter().any(|f| lower.contains(f))
}

pub fn has_responsive_classes(class_names: &str) -> bool {
    responsive_class_re().is_match(class_names)
}

/// Combine the signals into a verdict and a capped 0–100 score.
pub fn mobile_facts(inputs: &MobileInputs<'_>) -> MobileFacts {
    let media_queries = has_media_queries(inputs.style_text) || inputs.media_attribute;
    let css_framework = detect_framework(inputs.markup);
    let responsive_classes = has_responsive_classes(inputs.class_names);

    let mut score = 0u32;
    if inputs.has_viewport {
        score += VIEWPORT_POINTS;
    }
    if media_queries {
        score += MEDIA_QUERY_POINTS;
    }
    if css_framework {
        score += FRAMEWORK_POINTS;
    }
    if responsive_classes {
        score += RESPONSIVE_CLASS_POINTS;
    }

    MobileFacts {
        has_viewport: inputs.has_viewport,
        is_responsive: media_queries || css_framework || responsive_classes,
        mobile_score: score.min(100) as u8,
        media_queries,
        css_framework,
        responsive_classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_signals() {
        let facts = mobile_facts(&MobileInputs::default());
        assert!(!facts.is_responsive);
        assert_eq!(facts.mobile_score, 0);
    }

    #[test]
    fn test_all_signals_cap_at_100() {
        let facts = mobile_facts(&MobileInputs {
            has_viewport: true,
            style_text: "@media (max-width: 600px) { body { font-size: 14px } }",
            media_attribute: false,
            markup: r#"<link href="/css/bootstrap.min.css" rel="stylesheet">"#,
            class_names: "container col-md-6",
        });
        assert!(facts.is_responsive);
        assert!(facts.media_queries && facts.css_framework && facts.responsive_classes);
        assert_eq!(facts.mobile_score, 100);
    }

    #[test]
    fn test_viewport_alone_is_not_responsive() {
        let facts = mobile_facts(&MobileInputs {
            has_viewport: true,
            ..Default::default()
        });
        assert!(!facts.is_responsive);
        assert_eq!(facts.mobile_score, 40);
    }

    #[test]
    fn test_tailwind_prefixes() {
        assert!(has_responsive_classes("flex md:flex-row"));
        assert!(has_responsive_classes("lg:w-1/2"));
        assert!(has_responsive_classes("d-md-none"));
        assert!(!has_responsive_classes("card shadow rounded"));
    }

    #[test]
    fn test_media_query_case_insensitive() {
        assert!(has_media_queries("@MEDIA screen and (min-width: 40em) {}"));
        assert!(!has_media_queries("body { margin: 0 }"));
    }
}
