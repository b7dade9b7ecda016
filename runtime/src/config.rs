//! Runtime configuration, read from the environment.

use crate::acquisition::http_client::MIN_FETCH_TIMEOUT_MS;
use crate::acquisition::pagespeed::DEFAULT_ENDPOINT;
use site_audit::TrustPolicy;

pub const DEFAULT_RACE_WINDOW_MS: u64 = 5_000;
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 25_000;

/// Everything the network side needs, built once per analysis call.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    /// How long the orchestrator waits for the fetch before degrading.
    pub race_window_ms: u64,
    /// Requested fetch timeout; the fetcher raises it to its floor.
    pub fetch_timeout_ms: u64,
    pub oracle_timeout_ms: u64,
    /// Absent key disables the oracle.
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_endpoint: String,
    pub trust: TrustPolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            race_window_ms: DEFAULT_RACE_WINDOW_MS,
            fetch_timeout_ms: MIN_FETCH_TIMEOUT_MS,
            oracle_timeout_ms: DEFAULT_ORACLE_TIMEOUT_MS,
            pagespeed_api_key: None,
            pagespeed_endpoint: DEFAULT_ENDPOINT.to_string(),
            trust: TrustPolicy::default(),
        }
    }
}

impl AuditConfig {
    /// Read `SITE_AUDIT_*` and `PAGESPEED_API_KEY`; unset or unparsable
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            race_window_ms: read_env_u64("SITE_AUDIT_RACE_WINDOW_MS", defaults.race_window_ms),
            fetch_timeout_ms: read_env_u64("SITE_AUDIT_FETCH_TIMEOUT_MS", defaults.fetch_timeout_ms),
            oracle_timeout_ms: read_env_u64(
                "SITE_AUDIT_ORACLE_TIMEOUT_MS",
                defaults.oracle_timeout_ms,
            ),
            pagespeed_api_key: read_env_string("PAGESPEED_API_KEY").filter(|k| !k.is_empty()),
            pagespeed_endpoint: read_env_string("SITE_AUDIT_PAGESPEED_ENDPOINT")
                .filter(|e| !e.is_empty())
                .unwrap_or(defaults.pagespeed_endpoint),
            trust: read_env_string("SITE_AUDIT_TRUSTED_HOSTS")
                .map(|list| TrustPolicy::parse_list(&list))
                .unwrap_or_default(),
        }
    }
}

fn read_env_u64(name: &str, default_value: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default_value)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string())
}
