//! # GreenPrint - Carbon Footprint Assessment Server
//!
//! The main binary for the GreenPrint emission engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based, per-session isolation)
//! - CLI interface for one-shot assessments and report export
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              apps/greenprint (THE BINARY)            │
//! │                                                      │
//! │   ┌─────────────┐          ┌─────────────┐          │
//! │   │    CLI      │          │  HTTP API   │          │
//! │   │   (clap)    │          │   (axum)    │          │
//! │   └──────┬──────┘          └──────┬──────┘          │
//! │          │                        │                  │
//! │          └──────────┬─────────────┘                  │
//! │                     ▼                                │
//! │           ┌──────────────────┐                       │
//! │           │ greenprint-core  │                       │
//! │           │   (THE LOGIC)    │                       │
//! │           └──────────────────┘                       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! greenprint serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! greenprint countries
//! greenprint activities
//! greenprint assess --country Germany --inputs my_month.toml
//! greenprint report --country Germany --inputs my_month.toml --output report.txt
//! ```

use clap::Parser;
use greenprint::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — GREENPRINT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GREENPRINT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "greenprint=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the GreenPrint startup banner.
fn print_banner() {
    println!(
        r#"
   ██████╗ ██████╗ ███████╗███████╗███╗   ██╗
  ██╔════╝ ██╔══██╗██╔════╝██╔════╝████╗  ██║
  ██║  ███╗██████╔╝█████╗  █████╗  ██╔██╗ ██║
  ██║   ██║██╔══██╗██╔══╝  ██╔══╝  ██║╚██╗██║
  ╚██████╔╝██║  ██║███████╗███████╗██║ ╚████║
   ╚═════╝ ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝  ╚═══╝

  GreenPrint Carbon Footprint v{}

  kg CO₂ per month • fail-open • deterministic
"#,
        env!("CARGO_PKG_VERSION")
    );
}
