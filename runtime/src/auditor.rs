// Copyright 2026 Site Audit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Orchestrator: one analysis per call.
//!
//! The fetch and the oracle query start together. The fetch runs in its
//! own task and is raced against the window; if the window closes first
//! the task is detached (not aborted) and the degraded path runs. The
//! oracle result is awaited in either case and folded into whichever
//! path ran.

use crate::acquisition::http_client::{FetchedPage, Fetcher};
use crate::acquisition::pagespeed::OracleClient;
use crate::config::AuditConfig;
use site_audit::analyzer::PageContext;
use site_audit::{
    degraded_path, fast_path, normalize_url, AnalysisResult, FetchFailure, PerformanceReport,
};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub struct Auditor {
    config: AuditConfig,
    fetcher: Fetcher,
    oracle: Option<OracleClient>,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Self {
        let fetcher = Fetcher::new(config.fetch_timeout_ms);
        let oracle = OracleClient::from_config(&config);
        Self {
            config,
            fetcher,
            oracle,
        }
    }

    /// Analyze the site at `input`.
    ///
    /// Network failures never surface here; they produce a degraded
    /// result. Errors are an invalid URL or a broken score invariant.
    pub async fn analyze_site(&self, input: &str) -> site_audit::Result<AnalysisResult> {
        let url = normalize_url(input)?;
        let trusted = self.config.trust.is_trusted(&url);
        let window_ms = self.config.race_window_ms;
        info!(url = %url, trusted, window_ms, oracle = self.oracle.is_some(), "analysis started");

        let started = Instant::now();
        let fetcher = self.fetcher.clone();
        let target = url.to_string();
        let mut fetch_task = tokio::spawn(async move { fetcher.fetch(&target).await });

        let oracle_task = self.oracle.clone().map(|oracle| {
            let target = url.to_string();
            tokio::spawn(async move { oracle.query(&target).await })
        });

        // Err carries the failure and how long the fetch ran before it was known.
        let page: Result<FetchedPage, (FetchFailure, u64)> =
            match tokio::time::timeout(Duration::from_millis(window_ms), &mut fetch_task).await {
                Ok(Ok(Ok(page))) => Ok(page),
                Ok(Ok(Err(e))) => {
                    warn!(url = %url, "fetch failed ({e}), using degraded path");
                    Err((e.failure(), elapsed_ms(started)))
                }
                Ok(Err(e)) => {
                    warn!(url = %url, "fetch task failed ({e}), using degraded path");
                    Err((FetchFailure::NetworkError, elapsed_ms(started)))
                }
                Err(_) => {
                    warn!(url = %url, window_ms, "race window expired, using degraded path");
                    Err((FetchFailure::Timeout, window_ms))
                }
            };
        // Dropping the handle detaches the task; a late fetch finishes unobserved.
        drop(fetch_task);

        let report: Option<PerformanceReport> = match oracle_task {
            Some(task) => task.await.unwrap_or_else(|e| {
                warn!(url = %url, "performance oracle task failed: {e}");
                None
            }),
            None => None,
        };

        let result = match page {
            Ok(page) => {
                let served = PageContext {
                    url: &page.final_url,
                    load_time_ms: page.elapsed_ms,
                };
                fast_path(&url, &page.body, served, report.as_ref(), trusted)?
            }
            Err((failure, waited_ms)) => {
                degraded_path(&url, trusted, failure, waited_ms, report.as_ref())?
            }
        };
        info!(
            url = %url,
            path = ?result.path,
            score = result.overall_score,
            "analysis finished"
        );
        Ok(result)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
