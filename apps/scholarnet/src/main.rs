//! # Scholarnet - Catalog Explorer
//!
//! The main binary for the Scholarnet affiliation/publication catalog.
//!
//! ## Usage
//!
//! ```bash
//! # Catalog overview
//! scholarnet -d catalog.toml status
//!
//! # Queries
//! scholarnet -d catalog.json affiliations --order distance
//! scholarnet -d catalog.json path --kind shortest --from TUNI --to AALTO
//! scholarnet -d catalog.json --json-mode citations -p 12 --mode all
//! ```

use clap::Parser;
use scholarnet::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // SCHOLARNET_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SCHOLARNET_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "scholarnet=debug,scholarnet_core=debug"
    } else {
        "scholarnet=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    match cli::execute(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the Scholarnet startup banner.
fn print_banner() {
    println!(
        r#"
  scholarnet v{}
  affiliations - publications - citations
"#,
        env!("CARGO_PKG_VERSION")
    );
}
