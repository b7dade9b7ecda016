//! Outbound network calls: the page fetch and the page-speed oracle.

pub mod http_client;
pub mod pagespeed;
