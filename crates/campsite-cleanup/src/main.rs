//! Deletes or anonymizes bookings past the retention window.
//!
//! Meant to be run by hand or from cron, e.g. once a day.

use std::process;

use clap::Parser;

use campsite_cleanup::cli::{self, Cli};

fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campsite_cleanup=info,campsite_db=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli::run(&cli) {
        Ok(report) => println!("{report}"),
        Err(error) => {
            eprintln!("{error:#}");
            process::exit(1);
        }
    }
}
