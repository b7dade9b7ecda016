//! CLI subcommand implementations for the site-audit binary.

pub mod analyze_cmd;
pub mod output;
pub mod serve_cmd;
