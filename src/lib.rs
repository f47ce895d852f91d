//! Scrape laptop listings and product details from Amazon India.
//!
//! `LaptopScraper` walks the search results for a region concurrently,
//! visits every product's detail page and returns the extracted
//! `ProductRecord`s in page order. The `store` module persists them as a
//! JSON snapshot and as gzip-compressed newline-delimited JSON.
//!
//! ```no_run
//! use laptop_scraper::{store, LaptopScraper, ScraperConfig, BANGALORE_PINCODE};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let scraper = LaptopScraper::new(ScraperConfig::default())?;
//!     let laptops = scraper.extract_region(BANGALORE_PINCODE, 2).await;
//!     store::save_to_json(&laptops, "bangalore_laptops.json")?;
//!     Ok(())
//! }
//! ```

mod config;
mod fetch;
mod product_details;
mod search;
pub mod store;

pub use config::{build_headers, ScraperConfig, BANGALORE_PINCODE, DELHI_PINCODE};
pub use fetch::Fetcher;
pub use product_details::{Dataset, ProductRecord, Specification, NOT_AVAILABLE};
pub use search::{LaptopScraper, ListingPage, RegionReport};
pub use url::Url;
