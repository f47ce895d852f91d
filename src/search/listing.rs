use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{error, info, instrument, warn};

use super::LaptopScraper;
use crate::ProductRecord;

static CARD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "div.sg-col-20-of-24.s-result-item.s-asin.sg-col-0-of-12.sg-col-16-of-20.AdHolder.sg-col.s-widget-spacing-small.sg-col-12-of-16",
    )
    .unwrap()
});
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.a-link-normal.s-no-outline").unwrap());

#[derive(Debug, Default)]
/// Outcome of scraping one search results page.
pub struct ListingPage {
    /// 1-based page index.
    pub page: usize,
    /// Whether the results page itself was fetched.
    pub fetched: bool,
    /// Products extracted from the page, in document order.
    pub records: Vec<ProductRecord>,
    /// Cards that were found but yielded no record.
    pub skipped_items: usize,
}

impl ListingPage {
    pub(crate) fn skipped(page: usize) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }
}

/// Collects the detail page link of every result card, in document order.
///
/// Cards without a usable link are returned as `None`.
pub(crate) fn parse_listing(body: &str) -> Vec<Option<String>> {
    let document = Html::parse_document(body);
    document
        .select(&CARD_SELECTOR)
        .map(|card| {
            card.select(&LINK_SELECTOR)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(String::from)
        })
        .collect()
}

impl LaptopScraper {
    /// Scrapes page `page` of the search results for `region`.
    ///
    /// A page that cannot be fetched comes back empty with `fetched` unset.
    /// Detail pages are fetched one after another.
    #[instrument(level = "info", skip(self))]
    pub async fn extract_listing_page(&self, region: &str, page: usize) -> ListingPage {
        let url = self.config().listing_url(region, page);
        let body = match self.fetcher.fetch(&url).await {
            Ok(Some(body)) => body,
            Ok(None) => {
                warn!(%url, "Listing page produced no content, skipping");
                return ListingPage::skipped(page);
            }
            Err(e) => {
                error!(error = %e, "Listing page failed, skipping");
                return ListingPage::skipped(page);
            }
        };

        let links = parse_listing(&body);
        info!(cards = links.len(), "Parsed listing page");

        let mut listing = ListingPage {
            page,
            fetched: true,
            ..Default::default()
        };
        for link in links {
            let Some(href) = link else {
                warn!("Result card has no product link");
                listing.skipped_items += 1;
                continue;
            };
            match self.extract_detail(&href).await {
                Ok(Some(record)) => listing.records.push(record),
                Ok(None) => listing.skipped_items += 1,
                Err(e) => {
                    error!(error = %e, %href, "Detail page failed, skipping");
                    listing.skipped_items += 1;
                }
            }
        }
        listing
    }
}
