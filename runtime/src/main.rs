// Copyright 2026 Site Audit Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use site_audit_runtime::cli::{self, analyze_cmd::AnalyzeOptions, output};
use std::net::IpAddr;

#[derive(Parser)]
#[command(
    name = "site-audit",
    about = "Site Audit: heuristic website quality scoring",
    version,
    after_help = "Run 'site-audit <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one website and print its scores
    Analyze {
        /// URL or bare domain (e.g. "example.com")
        url: String,
        /// Milliseconds to wait for the page before estimating
        #[arg(long)]
        race_window_ms: Option<u64>,
        /// Treat this host as trusted. Can be repeated.
        #[arg(long = "trusted-host")]
        trusted_hosts: Vec<String>,
        /// Skip the page-speed oracle even if a key is configured
        #[arg(long)]
        no_oracle: bool,
    },
    /// Serve the HTTP analysis API
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: IpAddr,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn init_logging(cli: &Cli) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var(output::JSON_ENV, "1");
    }
    if cli.quiet {
        std::env::set_var(output::QUIET_ENV, "1");
    }
    init_logging(&cli);

    let result = match cli.command {
        Commands::Analyze {
            url,
            race_window_ms,
            trusted_hosts,
            no_oracle,
        } => {
            let options = AnalyzeOptions {
                race_window_ms,
                trusted_hosts,
                no_oracle,
            };
            cli::analyze_cmd::run(&url, &options).await
        }
        Commands::Serve { port, bind } => cli::serve_cmd::run(bind, port).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "site-audit", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !output::is_quiet() && !output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
