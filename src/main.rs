use clap::Parser;
use site_pitch::{AppConfig, BrowserFetcher, FileFetcher, Pipeline};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    }
    .with_env_overrides();
    if let Some(log_dir) = args.log_dir {
        config.log_dir = log_dir;
    }
    let fetcher = BrowserFetcher::from_config(&config);

    // Clears the log directory before anything is fetched
    let pipeline = Pipeline::prepare(config)?
        .with_tone(args.tone)
        .with_force(args.force);

    // Pull site html and attempt to extract useful data
    println!("Site to scrape: {}", args.site_url);
    println!("Starting scrape.\n");
    let document = match &args.html_file {
        Some(path) => pipeline.scrape(&FileFetcher::new(path), &args.site_url).await?,
        None => pipeline.scrape(&fetcher, &args.site_url).await?,
    };

    let extracted = match pipeline.extract(&document) {
        Ok(extracted) => extracted,
        Err(rejected) => {
            println!("{}\n", rejected);
            return Ok(ExitCode::from(1));
        }
    };
    println!("Extracted data:");
    println!("{}", extracted);

    // Perform generation
    println!("Requested tone: {}", pipeline.tone());
    println!("Starting advertisement generation.");
    let generated = pipeline.generate(&extracted).await?;
    println!("Finished generation.\n\n");
    println!("{}", generated);

    ::log::info!("Logs written to {}", pipeline.run_log().dir().display());
    Ok(ExitCode::SUCCESS)
}
