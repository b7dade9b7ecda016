// Copyright 2026 Site Audit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Site audit runtime: the network side of an analysis.
//!
//! Fetches pages, queries the page-speed oracle, races the fetch against
//! a window, and serves the result over a CLI and an HTTP API. The
//! scoring itself lives in the `site_audit` crate.

pub mod acquisition;
pub mod auditor;
pub mod cli;
pub mod config;
pub mod rest;

pub use auditor::Auditor;
pub use config::AuditConfig;
