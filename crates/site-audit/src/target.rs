//! Target URL handling.

use crate::error::{AuditError, Result};
use url::Url;

/// Parse a user-supplied address into an absolute `http`/`https` URL.
///
/// Surrounding whitespace is ignored and a bare host (`example.com/page`)
/// gets `https://` prepended.
pub fn normalize_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AuditError::InvalidUrl("empty address".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| AuditError::InvalidUrl(format!("{trimmed}: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AuditError::InvalidUrl(format!(
                "{trimmed}: unsupported scheme '{other}'"
            )))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(AuditError::InvalidUrl(format!("{trimmed}: missing host")));
    }
    Ok(url)
}

/// Lowercased host without a leading `www.`.
pub fn bare_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Whether the host ends in a two-letter country-code TLD.
pub fn has_country_tld(host: &str) -> bool {
    let host = host.trim_end_matches('.');
    match host.rsplit_once('.') {
        Some((_, tld)) => tld.len() == 2 && tld.bytes().all(|b| b.is_ascii_alphabetic()),
        None => false,
    }
}
