//! Terminal output helpers shared by the subcommands.
//!
//! Global flags are published through environment variables so any
//! command can check them without threading the parsed CLI around.

use site_audit::{AnalysisPath, AnalysisResult, Urgency};

pub const JSON_ENV: &str = "SITE_AUDIT_JSON";
pub const QUIET_ENV: &str = "SITE_AUDIT_QUIET";

pub fn is_json() -> bool {
    std::env::var_os(JSON_ENV).is_some()
}

pub fn is_quiet() -> bool {
    std::env::var_os(QUIET_ENV).is_some()
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: could not serialize output: {e}"),
    }
}

fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::High => "high",
        Urgency::Medium => "medium",
        Urgency::Low => "low",
    }
}

/// Human-readable report for one analysis.
pub fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n  {}\n", result.url));
    if !result.title.is_empty() && result.title != result.url {
        out.push_str(&format!("  {}\n", result.title));
    }
    if result.path == AnalysisPath::Degraded {
        out.push_str("  (site unavailable; scores estimated from the address)\n");
    }
    out.push('\n');

    for (category, score) in result.score_breakdown.categories() {
        out.push_str(&format!(
            "    {:<20} {:>3} / {:<3}\n",
            category.label(),
            score.score,
            score.max_score
        ));
    }
    out.push_str(&format!(
        "\n    {:<20} {:>3} / 100   urgency: {}\n",
        "Overall",
        result.overall_score,
        urgency_label(result.urgency())
    ));

    if !result.recommendations.is_empty() {
        out.push_str("\n  Recommendations:\n");
        for (i, rec) in result.recommendations.iter().enumerate() {
            out.push_str(&format!("    {:>2}. {rec}\n", i + 1));
        }
    }
    out
}
