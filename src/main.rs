// Entry point: one linear pass from the campaign export to the report.
//
// load -> clean -> derive metrics -> rank -> recommend -> print/export.
// Each stage hands its table to the next; nothing is shared or global.
mod config;
mod error;
mod loader;
mod metrics;
mod output;
mod reports;
mod types;
mod util;

use crate::config::Config;
use crate::error::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cfg = Config::default();

    // Diagnostics go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cfg) {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

fn run(cfg: &Config) -> Result<()> {
    let (table, load_report) = loader::load_and_clean(&cfg.input_path)?;
    info!(
        "Loaded {} markets from {} ({} with zero leads treated as missing)",
        util::format_int(load_report.total_rows),
        cfg.input_path,
        util::format_int(load_report.zero_lead_rows)
    );

    let table = metrics::derive_metrics(table);
    let analysis = reports::analyze_performance(&table);
    let recommendations = reports::budget_recommendations(&analysis);

    print!("{}", reports::render_report(&analysis, &recommendations));

    output::write_xlsx(&cfg.output_path, &table)?;
    Ok(())
}
