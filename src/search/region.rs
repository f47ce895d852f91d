use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument};

use super::{LaptopScraper, ListingPage};
use crate::Dataset;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Summary of a region scrape, for logging what was dropped.
pub struct RegionReport {
    pub region: String,
    pub pages_requested: usize,
    /// Listing pages that could not be fetched at all.
    pub pages_skipped: usize,
    /// Result cards whose detail page yielded no record.
    pub items_skipped: usize,
    pub records: usize,
}

impl LaptopScraper {
    /// Scrapes pages `1..=page_count` for `region` and flattens them into one
    /// dataset ordered by page, then by position on the page.
    pub async fn extract_region(&self, region: &str, page_count: usize) -> Dataset {
        let (dataset, report) = self.extract_region_with_report(region, page_count).await;
        info!(?report, "Region scraped");
        dataset
    }

    /// Like [`extract_region`](Self::extract_region), also reporting how many
    /// pages and items were skipped.
    ///
    /// At most `concurrency` listing pages are in flight. Every page is
    /// awaited before results are assembled.
    #[instrument(level = "info", skip(self))]
    pub async fn extract_region_with_report(
        &self,
        region: &str,
        page_count: usize,
    ) -> (Dataset, RegionReport) {
        let workers = self.config().concurrency.min(page_count).max(1);

        // `buffered` yields in input order, whatever order the pages finish in
        let pages: Vec<ListingPage> = stream::iter(1..=page_count)
            .map(|page| {
                let scraper = self.clone();
                let region = region.to_owned();
                async move {
                    let worker = tokio::spawn(async move {
                        scraper.extract_listing_page(&region, page).await
                    });
                    match worker.await {
                        Ok(listing) => listing,
                        Err(e) => {
                            error!(error = %e, page, "Listing worker panicked");
                            ListingPage::skipped(page)
                        }
                    }
                }
            })
            .buffered(workers)
            .collect()
            .await;

        let mut report = RegionReport {
            region: region.to_owned(),
            pages_requested: page_count,
            ..Default::default()
        };
        let mut dataset = Dataset::new();
        for listing in pages {
            if !listing.fetched {
                report.pages_skipped += 1;
            }
            report.items_skipped += listing.skipped_items;
            dataset.extend(listing.records);
        }
        report.records = dataset.len();

        (dataset, report)
    }
}
