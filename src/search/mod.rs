mod listing;
mod region;

use std::sync::Arc;

use eyre::Result;

use crate::{Fetcher, ProductRecord, ScraperConfig};

pub use listing::ListingPage;
pub use region::RegionReport;

/// Scrapes laptop search results and their detail pages for a region.
///
/// Cheap to clone; clones share the HTTP client and configuration.
#[derive(Debug, Clone)]
pub struct LaptopScraper {
    fetcher: Fetcher,
}

impl LaptopScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(Arc::new(config))?,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        self.fetcher.config()
    }

    /// Resolves a listing card's link and extracts the product behind it.
    pub async fn extract_detail(&self, href: &str) -> Result<Option<ProductRecord>> {
        ProductRecord::fetch(&self.fetcher, href).await
    }
}
