use clap::Parser;
use tokio::runtime::Runtime;

use season_lens::{AnalysisEngine, Cli, Command};

/// One JSON document on stdout per invocation; logs go to stderr.
/// A `success=false` payload still exits 0 — failures are data for the
/// consuming layer, not process faults.
fn main() -> anyhow::Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Build the engine and run the requested operation
    let rt = Runtime::new()?;
    let engine = AnalysisEngine::with_default_providers()?;

    let json = rt.block_on(async {
        match args.command {
            Command::Fetch { symbol, file } => {
                serde_json::to_string(&engine.fetch_price_data(&symbol, &file).await)
            }
            Command::Calculate { file, year } => {
                serde_json::to_string(&engine.calculate_seasonality(&file, year).await)
            }
            Command::FetchCot { symbol, file } => {
                serde_json::to_string(&engine.fetch_cot_data(&symbol, &file).await)
            }
            Command::CalculateCot { file, years } => {
                serde_json::to_string(&engine.calculate_cot_metrics(&file, years).await)
            }
        }
    })?;

    println!("{}", json);
    Ok(())
}
