//! Performance oracle client (PageSpeed Insights v5).
//!
//! Optional by construction: without an API key no client exists, and any
//! failure or partial response yields `None` rather than an error.

use crate::config::AuditConfig;
use serde_json::Value;
use site_audit::PerformanceReport;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Audits read from the report, in `PerformanceReport` field order.
const AUDITS: [&str; 4] = [
    "first-contentful-paint",
    "largest-contentful-paint",
    "cumulative-layout-shift",
    "speed-index",
];

#[derive(Clone)]
pub struct OracleClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OracleClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Client for `config`, or `None` when no API key is configured.
    pub fn from_config(config: &AuditConfig) -> Option<Self> {
        let key = config.pagespeed_api_key.as_deref()?.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(
            config.pagespeed_endpoint.clone(),
            key,
            config.oracle_timeout_ms,
        ))
    }

    /// Query the oracle for `url`. Never fails; unusable answers are `None`.
    pub async fn query(&self, url: &str) -> Option<PerformanceReport> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("url", url),
                ("key", self.api_key.as_str()),
                ("category", "performance"),
                ("strategy", "mobile"),
            ])
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                warn!(url, "performance oracle request failed: {e}");
                return None;
            }
        };
        if !resp.status().is_success() {
            warn!(url, status = resp.status().as_u16(), "performance oracle rejected request");
            return None;
        }
        let doc = match resp.json::<Value>().await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(url, "performance oracle returned invalid JSON: {e}");
                return None;
            }
        };

        let report = parse_report(&doc);
        match &report {
            Some(r) => debug!(url, score = r.score, "performance oracle report received"),
            None => warn!(url, "performance oracle response is missing required fields"),
        }
        report
    }
}

fn audit_value(doc: &Value, audit: &str) -> Option<f64> {
    doc.get("lighthouseResult")?
        .get("audits")?
        .get(audit)?
        .get("numericValue")?
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Destructure a PageSpeed document field by field.
///
/// Returns `None` unless the performance score (0–1) and all four timing
/// audits are present and numeric.
pub fn parse_report(doc: &Value) -> Option<PerformanceReport> {
    let score = doc
        .get("lighthouseResult")?
        .get("categories")?
        .get("performance")?
        .get("score")?
        .as_f64()
        .filter(|s| (0.0..=1.0).contains(s))?;

    let [fcp, lcp, cls, si] = AUDITS;
    Some(PerformanceReport {
        score,
        first_contentful_paint_ms: audit_value(doc, fcp)?,
        largest_contentful_paint_ms: audit_value(doc, lcp)?,
        cumulative_layout_shift: audit_value(doc, cls)?,
        speed_index_ms: audit_value(doc, si)?,
    })
}
