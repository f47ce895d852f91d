use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use eyre::Result;
use laptop_scraper::{store, LaptopScraper, ScraperConfig, BANGALORE_PINCODE, DELHI_PINCODE};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scrape laptops from Amazon India for one or more regions.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Region as `name=pincode`, may be repeated
    #[arg(short, long = "region", value_parser = parse_region)]
    regions: Vec<(String, String)>,

    /// Number of search result pages per region
    #[arg(short, long, default_value_t = 10)]
    pages: usize,

    /// Listing pages fetched at the same time
    #[arg(short, long, default_value_t = 10)]
    concurrency: usize,

    /// Attempts per URL
    #[arg(long, default_value_t = 10)]
    max_retries: u32,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = 5)]
    retry_delay_secs: u64,

    #[arg(long, default_value = "https://www.amazon.in")]
    base_url: String,

    /// Directory the output files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn parse_region(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, pincode)| (name.trim().to_owned(), pincode.trim().to_owned()))
        .filter(|(name, pincode)| !name.is_empty() && !pincode.is_empty())
        .ok_or_else(|| format!("expected name=pincode, got `{arg}`"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let regions = if cli.regions.is_empty() {
        vec![
            ("bangalore".to_owned(), BANGALORE_PINCODE.to_owned()),
            ("delhi".to_owned(), DELHI_PINCODE.to_owned()),
        ]
    } else {
        cli.regions
    };

    let config = ScraperConfig::default()
        .with_base_url(&cli.base_url)?
        .with_concurrency(cli.concurrency)
        .with_max_retries(cli.max_retries)
        .with_retry_delay(Duration::from_secs(cli.retry_delay_secs));
    let scraper = LaptopScraper::new(config)?;
    std::fs::create_dir_all(&cli.output_dir)?;

    for (name, pincode) in &regions {
        let laptops = scraper.extract_region(pincode, cli.pages).await;
        store::save_to_json(&laptops, cli.output_dir.join(format!("{name}_laptops.json")))?;
        store::save_to_gzip_ndjson(
            &laptops,
            cli.output_dir.join(format!("{name}_laptops.ndjson.gz")),
        )?;
    }

    for (name, _) in &regions {
        let laptops =
            store::read_from_gzip_ndjson(cli.output_dir.join(format!("{name}_laptops.ndjson.gz")))?;
        info!(region = %name, count = laptops.len(), "Read back");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["laptop_scraper"]);
        assert!(cli.regions.is_empty());
        assert_eq!(cli.pages, 10);
        assert_eq!(cli.max_retries, 10);
        assert_eq!(cli.retry_delay_secs, 5);
    }

    #[test]
    fn test_cli_regions() {
        let cli = Cli::parse_from([
            "laptop_scraper",
            "--region",
            "mumbai=400001",
            "-r",
            "pune=411001",
            "--pages",
            "3",
        ]);
        assert_eq!(
            cli.regions,
            vec![
                ("mumbai".to_owned(), "400001".to_owned()),
                ("pune".to_owned(), "411001".to_owned())
            ]
        );
        assert_eq!(cli.pages, 3);
    }

    #[test]
    fn test_parse_region_rejects_bare_pincode() {
        assert!(parse_region("560001").is_err());
        assert!(parse_region("=560001").is_err());
    }
}
