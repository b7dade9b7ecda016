//! `site-audit analyze <url>`: run one analysis and print the report.

use crate::auditor::Auditor;
use crate::cli::output;
use crate::config::AuditConfig;
use anyhow::{Context, Result};
use site_audit::TrustPolicy;

/// Command-line overrides layered on top of the environment config.
#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    pub race_window_ms: Option<u64>,
    pub trusted_hosts: Vec<String>,
    pub no_oracle: bool,
}

impl AnalyzeOptions {
    fn apply(&self, mut config: AuditConfig) -> AuditConfig {
        if let Some(window) = self.race_window_ms {
            config.race_window_ms = window;
        }
        if !self.trusted_hosts.is_empty() {
            let hosts = config
                .trust
                .hosts()
                .iter()
                .cloned()
                .chain(self.trusted_hosts.iter().cloned());
            config.trust = TrustPolicy::new(hosts);
        }
        if self.no_oracle {
            config.pagespeed_api_key = None;
        }
        config
    }
}

/// Run the analyze command.
pub async fn run(url: &str, options: &AnalyzeOptions) -> Result<()> {
    let auditor = Auditor::new(options.apply(AuditConfig::from_env()));
    let result = auditor
        .analyze_site(url)
        .await
        .with_context(|| format!("could not analyze '{url}'"))?;

    if output::is_json() {
        output::print_json(&serde_json::to_value(&result)?);
    } else {
        print!("{}", output::render_report(&result));
    }
    Ok(())
}
