use clap::Parser;
use std::path::PathBuf;

/// Site scraped when no URL is given
pub const DEFAULT_SITE_URL: &str = "https://startstudio.com/";

#[derive(Parser, Debug)]
#[command(name = "site-pitch")]
#[command(about = "Scrape website data and create a social media post.")]
#[command(version)]
pub struct Args {
    /// The site you would like to scrape your data from
    #[arg(default_value = DEFAULT_SITE_URL)]
    pub site_url: String,

    /// Tone of the generated advertisement
    #[arg(long, default_value = site_pitch::DEFAULT_TONE)]
    pub tone: String,

    /// Force advertisement generation even if the scraper detects an error
    #[arg(long)]
    pub force: bool,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for run logs (recreated empty on every run)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Read the page HTML from this file instead of launching a browser
    #[arg(long)]
    pub html_file: Option<PathBuf>,
}
