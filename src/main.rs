use crate::config::HttpConfig;
use crate::errors::AppError;
use crate::pipeline::Pipeline;
use crate::scraper::HttpClient;
use crate::spreadsheets::{default_report_path, dump_template, export_report_xlsx, InputSheet};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod domain;
mod errors;
mod pipeline;
mod scraper;
mod spreadsheets;

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "card-price-fetcher")]
#[command(about = "Fill a card sheet with the latest marketplace prices")]
struct Args {
    /// Input sheet, .xlsx or .csv (or the template path with --dump)
    file: PathBuf,

    /// Lowest price to search for
    #[arg(long)]
    min: Option<f64>,

    /// Highest price to search for
    #[arg(long)]
    max: Option<f64>,

    /// Marketplace to search: ebay, 130point or 130point-all
    #[arg(long, short, default_value = "ebay")]
    platform: String,

    /// Where to write the XLSX report (defaults to the input itself for .xlsx, else a sibling .xlsx)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write an empty template sheet instead of fetching prices
    #[arg(long, short)]
    dump: bool,
}

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    if args.dump {
        let path = dump_template(&args.file)?;
        println!("Wrote template to {}", path.display());
        return Ok(());
    }

    let config = HttpConfig::from_env();
    let http = HttpClient::new(&config)?;
    let pipeline = Pipeline::for_platform(&args.platform, &config, &http)?;

    let sheet = InputSheet::read(&args.file)?;
    let pending = sheet.pending_count();
    if pending == 0 {
        println!("No data to process.");
        return Ok(());
    }
    println!("Read {} items from {}", pending, args.file.display());

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_report_path(&args.file));

    println!("Fetching prices from {}...", pipeline.platform_name());
    let requests = sheet.requests(args.min, args.max);

    match pipeline.run(&requests) {
        Ok(records) => {
            export_report_xlsx(&output, &sheet, &records)?;
            println!("✅ Wrote {} items to {}", records.len(), output.display());
            Ok(())
        }
        Err(aborted) => {
            // Keep what finished before the failure.
            export_report_xlsx(&output, &sheet, &aborted.completed)?;
            println!(
                "Wrote {} completed items to {} before stopping",
                aborted.completed.len(),
                output.display()
            );
            Err(aborted.into())
        }
    }
}
