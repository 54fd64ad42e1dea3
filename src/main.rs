use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use unlinked_mentions::crawlers::HttpFetcher;
use unlinked_mentions::crawlers::SitemapError;
use unlinked_mentions::{Scan, ScanError, inputs};

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            eprintln!("error: {}", e);
            if let Some(ScanError::Sitemap(SitemapError::IndexOnly { sitemaps })) =
                e.downcast_ref::<ScanError>()
            {
                eprintln!("child sitemaps:");
                for sitemap in sitemaps {
                    eprintln!("  {}", sitemap);
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Validate every input before touching the network
    let config = args.scan_config()?;
    let targets = inputs::load_targets(&args.targets)?;
    let source = args.candidate_source()?;

    let fetcher = HttpFetcher::from_config(&config)?;
    let scan = Scan::new(targets, source).with_config(config);

    let start_time = std::time::Instant::now();
    let report = scan
        .run_with(&fetcher, |progress| {
            eprintln!(
                "[{}/{}] targets done, {} opportunities so far",
                progress.targets_done, progress.targets_total, progress.opportunities
            );
        })
        .await?;

    ::log::info!(
        "Scan complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    match &args.output {
        Some(path) => {
            report.write_csv(BufWriter::new(File::create(path)?))?;
            eprintln!("Report written to {}", path.display());
        }
        None => report.write_csv(io::stdout().lock())?,
    }

    if report.opportunities.is_empty() {
        eprintln!("No unlinked mentions found in the scanned pages.");
    }
    eprintln!("{}", report.summary());

    if args.json {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
