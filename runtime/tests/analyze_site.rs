//! End-to-end analyses against a local mock site and mock oracle.

use serde_json::{json, Value};
use site_audit::{AnalysisPath, MetricSource, TrustPolicy};
use site_audit_runtime::rest::{router, RestState};
use site_audit_runtime::{AuditConfig, Auditor};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Harbor Bakery: Fresh Sourdough Daily in Town</title>
  <meta name="description" content="Harbor Bakery bakes sourdough, rye and seasonal pastries every morning. Order ahead online or visit our shop by the harbor.">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="robots" content="index, follow">
  <link rel="canonical" href="/">
  <style>@media (max-width: 600px) { nav { display: none; } }</style>
</head>
<body>
  <h1>Harbor Bakery</h1>
  <h2>Our bread</h2>
  <p>Every loaf is fermented for two days and baked in a stone oven before sunrise.</p>
  <h2>Visit us</h2>
  <p>We are open from seven until two, every day except Monday.</p>
  <a href="/menu">Menu</a> <a href="/about">About</a> <a href="https://maps.example.org/">Map</a>
</body>
</html>"#;

fn oracle_doc(score: f64) -> Value {
    json!({
        "lighthouseResult": {
            "categories": { "performance": { "score": score } },
            "audits": {
                "first-contentful-paint": { "numericValue": 900.0 },
                "largest-contentful-paint": { "numericValue": 1800.0 },
                "cumulative-layout-shift": { "numericValue": 0.01 },
                "speed-index": { "numericValue": 1300.0 }
            }
        }
    })
}

async fn site(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn config() -> AuditConfig {
    AuditConfig {
        race_window_ms: 3_000,
        ..AuditConfig::default()
    }
}

#[tokio::test]
async fn test_fast_path_for_reachable_site() {
    let server = site(PAGE).await;
    let result = Auditor::new(config()).analyze_site(&server.uri()).await.unwrap();

    assert_eq!(result.path, AnalysisPath::Fast);
    assert_eq!(result.title, "Harbor Bakery: Fresh Sourdough Daily in Town");
    assert_eq!(result.facts.heading_structure.h1_count, 1);
    assert!(result.facts.mobile.has_viewport);
    assert!(result.score_breakdown.validate().is_ok());
    assert!(!result.recommendations.is_empty());
}

#[tokio::test]
async fn test_server_error_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let started = Instant::now();
    let result = Auditor::new(config()).analyze_site(&server.uri()).await.unwrap();
    assert_eq!(result.path, AnalysisPath::Degraded);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(result.facts.performance.load_time_ms < 3_000);
    assert!(result.recommendations[0].contains("returned HTTP 500"));
    assert_eq!(result.score_breakdown.total(), u32::from(result.overall_score));
}

#[tokio::test]
async fn test_missing_page_names_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = Auditor::new(config()).analyze_site(&server.uri()).await.unwrap();
    assert_eq!(result.path, AnalysisPath::Degraded);
    assert!(result.recommendations[0].starts_with("The site returned HTTP 404"));
    assert!(result.recommendations.iter().all(|r| !r.contains("did not respond")));
}

#[tokio::test]
async fn test_links_follow_the_redirect_target() {
    let target = MockServer::start().await;
    let port = target.address().port();
    let page = format!(
        r#"<html><body><h1>Moved</h1>
        <a href="http://localhost:{port}/a">A</a> <a href="http://localhost:{port}/b">B</a>
        <a href="http://localhost:{port}/c">C</a> <a href="http://localhost:{port}/d">D</a>
        <a href="http://localhost:{port}/e">E</a>
        </body></html>"#
    );
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&target)
        .await;

    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("http://localhost:{port}/")),
        )
        .mount(&origin)
        .await;

    let result = Auditor::new(config()).analyze_site(&origin.uri()).await.unwrap();
    assert_eq!(result.path, AnalysisPath::Fast);
    assert_eq!(result.url, format!("{}/", origin.uri()));
    assert_eq!(result.facts.technical.internal_links, 5);
    assert_eq!(result.facts.technical.external_links, 0);
}

#[tokio::test]
async fn test_slow_site_degrades_at_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let auditor = Auditor::new(AuditConfig {
        race_window_ms: 300,
        ..AuditConfig::default()
    });
    let started = Instant::now();
    let result = auditor.analyze_site(&server.uri()).await.unwrap();

    assert_eq!(result.path, AnalysisPath::Degraded);
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(result.facts.performance.load_time_ms, 300);
}

#[tokio::test]
async fn test_oracle_report_blends_into_fast_path() {
    let server = site(PAGE).await;
    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .and(query_param("key", "test-key"))
        .and(query_param("strategy", "mobile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oracle_doc(0.92)))
        .expect(1)
        .mount(&server)
        .await;

    let with_oracle = AuditConfig {
        pagespeed_api_key: Some("test-key".into()),
        pagespeed_endpoint: format!("{}/pagespeed", server.uri()),
        ..config()
    };
    let result = Auditor::new(with_oracle).analyze_site(&server.uri()).await.unwrap();

    assert_eq!(result.path, AnalysisPath::Fast);
    assert_eq!(result.facts.performance.performance_score, 92);
    assert_eq!(result.facts.performance.first_contentful_paint_ms, 900);
}

#[tokio::test]
async fn test_low_oracle_score_alerts_first() {
    let server = site(PAGE).await;
    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oracle_doc(0.41)))
        .mount(&server)
        .await;

    let with_oracle = AuditConfig {
        pagespeed_api_key: Some("test-key".into()),
        pagespeed_endpoint: format!("{}/pagespeed", server.uri()),
        ..config()
    };
    let result = Auditor::new(with_oracle).analyze_site(&server.uri()).await.unwrap();
    assert!(result.recommendations[0].starts_with("URGENT"));
    assert!(result.recommendations[0].contains("41/100"));
}

#[tokio::test]
async fn test_malformed_oracle_report_is_ignored() {
    let server = site(PAGE).await;
    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "lighthouseResult": {} })))
        .mount(&server)
        .await;

    let with_oracle = AuditConfig {
        pagespeed_api_key: Some("test-key".into()),
        pagespeed_endpoint: format!("{}/pagespeed", server.uri()),
        ..config()
    };
    let result = Auditor::new(with_oracle).analyze_site(&server.uri()).await.unwrap();

    assert_eq!(result.path, AnalysisPath::Fast);
    assert_eq!(result.facts.performance.source, MetricSource::Estimated);
    assert!(result.facts.performance.oracle_score().is_none());
}

#[tokio::test]
async fn test_oracle_not_queried_without_key() {
    let server = site(PAGE).await;
    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oracle_doc(0.9)))
        .expect(0)
        .mount(&server)
        .await;

    let no_key = AuditConfig {
        pagespeed_endpoint: format!("{}/pagespeed", server.uri()),
        ..config()
    };
    let result = Auditor::new(no_key).analyze_site(&server.uri()).await.unwrap();
    assert_eq!(result.path, AnalysisPath::Fast);
}

#[tokio::test]
async fn test_oracle_blends_into_degraded_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oracle_doc(0.9)))
        .mount(&server)
        .await;

    let with_oracle = AuditConfig {
        pagespeed_api_key: Some("test-key".into()),
        pagespeed_endpoint: format!("{}/pagespeed", server.uri()),
        ..config()
    };
    let result = Auditor::new(with_oracle).analyze_site(&server.uri()).await.unwrap();
    assert_eq!(result.path, AnalysisPath::Degraded);
    assert_eq!(result.facts.performance.performance_score, 90);
    assert!(result.score_breakdown.validate().is_ok());
}

#[tokio::test]
async fn test_trusted_host_gets_affirmations() {
    let server = site(PAGE).await;
    let external = Auditor::new(config()).analyze_site(&server.uri()).await.unwrap();
    let trusted = Auditor::new(AuditConfig {
        trust: TrustPolicy::parse_list("127.0.0.1"),
        ..config()
    })
    .analyze_site(&server.uri())
    .await
    .unwrap();

    assert!(trusted.overall_score >= external.overall_score);
    assert!(trusted.recommendations.iter().all(|r| !r.contains("Add")));
}

#[tokio::test]
async fn test_rest_analyze_echoes_requester() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    let server = site(PAGE).await;
    let app = router(RestState::with_config(config()));
    let body = json!({
        "url": server.uri(),
        "requester": { "name": "Dana", "company": "Harbor Bakery" }
    });
    let req = Request::post("/api/v1/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["requester"]["company"], "Harbor Bakery");
    assert_eq!(value["result"]["path"], "fast");
    assert!(value["result"]["overallScore"].as_u64().unwrap() <= 100);
}
