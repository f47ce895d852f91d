use crate::product_details::{specs, Specification};
use crate::Fetcher;
use eyre::Result;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Value stored for any field that could not be located on the page.
pub const NOT_AVAILABLE: &str = "Not available";

/// Records in page order, then in document order within a page.
pub type Dataset = Vec<ProductRecord>;

macro_rules! selector {
    ($css:literal) => {
        Lazy::new(|| Selector::parse($css).unwrap())
    };
}

static SKU: Lazy<Selector> = selector!("div#imageBlock_feature_div.celwidget");
static BRAND_ROW: Lazy<Selector> = selector!("tr.po-brand span.a-size-base.po-break-word");
static OVERVIEW_VALUE: Lazy<Selector> = selector!("span.a-size-base.po-break-word");
static MODEL_ROW: Lazy<Selector> = selector!("tr.a-spacing-small.po-model_name");
static TITLE: Lazy<Selector> = selector!("span#productTitle");
static SELLING_PRICE: Lazy<Selector> = selector!("span.a-price-whole");
static MRP: Lazy<Selector> = selector!("span.a-price.a-text-price");
static OFFSCREEN: Lazy<Selector> = selector!("span.a-offscreen");
static DISCOUNT: Lazy<Selector> = selector!(
    "span.a-size-large.a-color-price.savingPriceOverride.aok-align-center.reinventPriceSavingsPercentageMargin.savingsPercentage"
);
static CATEGORY: Lazy<Selector> = selector!("img.nav-categ-image");
static IMAGE: Lazy<Selector> = selector!("img#landingImage");
static DESCRIPTION: Lazy<Selector> = selector!("ul.a-unordered-list.a-vertical.a-spacing-mini");
static DELIVERY_FEE: Lazy<Selector> =
    selector!(r#"span[data-csa-c-type="element"][data-csa-c-delivery-price]"#);
static DELIVERY_TIME: Lazy<Selector> =
    selector!(r#"span[data-csa-c-type="element"][data-csa-c-delivery-time]"#);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A laptop scraped from its Amazon detail page.
///
/// Every field is always present. Anything that could not be found holds
/// [`NOT_AVAILABLE`], except `discount` which is left empty and `sku`
/// which is `None`.
pub struct ProductRecord {
    /// ASIN of the product.
    pub sku: Option<String>,
    /// Model name from the product overview.
    pub product_name: String,
    /// Full listing title.
    pub product_title: String,
    /// "About this item" bullet points.
    pub description: String,
    pub category: String,
    /// List price, as shown.
    pub mrp: String,
    /// Current price, as shown.
    pub selling_price: String,
    /// Savings percentage, e.g. `-23%`.
    pub discount: String,
    pub weight: String,
    pub brand_name: String,
    pub image_url: String,
    pub specification: Specification,
    pub delivery_fee: String,
    pub delivery_time: String,
}

impl ProductRecord {
    /// Fetches the detail page behind a listing card's `href` and extracts it.
    ///
    /// Returns `Ok(None)` when the page could not be fetched after retries.
    pub async fn fetch(fetcher: &Fetcher, href: &str) -> Result<Option<Self>> {
        let url = fetcher.config().detail_url(href)?;
        let Some(body) = fetcher.fetch(&url).await? else {
            warn!(%url, "Detail page produced no content");
            return Ok(None);
        };
        debug!(%url, bytes = body.len(), "Fetched detail page");
        Ok(Some(Self::from_html(&body)))
    }

    /// Extracts a record from a detail page.
    ///
    /// Each field is looked up on its own; a missing node only affects
    /// that field.
    pub fn from_html(body: &str) -> Self {
        let document = Html::parse_document(body);
        let first = |selector: &Lazy<Selector>| select_first(&document, selector);

        let sku = first(&SKU)
            .and_then(|elem| elem.value().attr("data-csa-c-asin"))
            .map(clean)
            .filter(|asin| !asin.is_empty())
            .map(String::from);

        let brand_name = first(&BRAND_ROW)
            .or_else(|| first(&OVERVIEW_VALUE))
            .map(text)
            .unwrap_or_else(not_available);

        let product_name = first(&MODEL_ROW)
            .and_then(|row| row.select(&OVERVIEW_VALUE).next())
            .map(text)
            .unwrap_or_else(not_available);

        // MRP sits one span deeper than the selling price
        let mrp = first(&MRP)
            .and_then(|price| price.select(&OFFSCREEN).next())
            .map(text)
            .unwrap_or_else(not_available);

        Self {
            sku,
            product_name,
            product_title: first(&TITLE).map(text).unwrap_or_else(not_available),
            description: first(&DESCRIPTION).map(text).unwrap_or_else(not_available),
            category: attr(first(&CATEGORY), "alt"),
            mrp,
            selling_price: first(&SELLING_PRICE).map(text).unwrap_or_else(not_available),
            discount: first(&DISCOUNT).map(text).unwrap_or_default(),
            weight: specs::row_value(&document, &specs::WEIGHT).unwrap_or_else(not_available),
            brand_name,
            image_url: attr(first(&IMAGE), "src"),
            specification: Specification::from_document(&document),
            delivery_fee: attr(first(&DELIVERY_FEE), "data-csa-c-delivery-price"),
            delivery_time: attr(first(&DELIVERY_TIME), "data-csa-c-delivery-time"),
        }
    }
}

fn select_first<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

fn not_available() -> String {
    NOT_AVAILABLE.into()
}

/// Trims whitespace and the left-to-right marks Amazon pads values with.
pub(crate) fn clean(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{200e}')
}

fn text(elem: ElementRef) -> String {
    clean(&elem.text().collect::<String>()).into()
}

fn attr(elem: Option<ElementRef>, name: &str) -> String {
    elem.and_then(|elem| elem.value().attr(name))
        .map(|value| value.into())
        .unwrap_or_else(not_available)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"
        <html><body>
          <img class="nav-categ-image" alt="Computers &amp; Accessories" src="/cat.png">
          <div id="imageBlock_feature_div" class="celwidget" data-csa-c-asin="B0CX23V2ZK">
            <img id="landingImage" src="https://m.media-amazon.com/images/I/laptop.jpg">
          </div>
          <span id="productTitle">  HP Laptop 15s, 12th Gen Intel Core i5  </span>
          <span class="a-size-large a-color-price savingPriceOverride aok-align-center reinventPriceSavingsPercentageMargin savingsPercentage">-23%</span>
          <span class="a-price-whole">54,990</span>
          <span class="a-price a-text-price"><span class="a-offscreen">₹71,332</span></span>
          <table>
            <tr class="a-spacing-small po-brand"><td><span class="a-size-base po-break-word">HP</span></td></tr>
            <tr class="a-spacing-small po-model_name"><td><span class="a-size-base po-break-word">15s-fq5111TU</span></td></tr>
          </table>
          <ul class="a-unordered-list a-vertical a-spacing-mini"><li>Fast</li></ul>
          <table>
            <tr><th>Processor Name</th><td class="a-size-base prodDetAttrValue">Core i5-1235U</td></tr>
            <tr><th>RAM Size</th><td class="a-size-base prodDetAttrValue">16 GB</td></tr>
            <tr><th>Item Weight</th><td class="a-size-base prodDetAttrValue">1 kg 690 g</td></tr>
            <tr><th>Graphics Coprocessor</th><td class="a-size-base prodDetAttrValue">Intel Iris Xe</td></tr>
            <tr><th>Graphics Card Ram Size</th><td class="a-size-base prodDetAttrValue">Shared</td></tr>
          </table>
          <span data-csa-c-type="element" data-csa-c-delivery-price="FREE"></span>
          <span data-csa-c-type="element" data-csa-c-delivery-time="Tuesday, 21 May"></span>
        </body></html>"#;

    #[test]
    fn test_from_html_extracts_all_fields() {
        let record = ProductRecord::from_html(DETAIL_PAGE);
        assert_eq!(record.sku.as_deref(), Some("B0CX23V2ZK"));
        assert_eq!(record.product_title, "HP Laptop 15s, 12th Gen Intel Core i5");
        assert_eq!(record.product_name, "15s-fq5111TU");
        assert_eq!(record.brand_name, "HP");
        assert_eq!(record.category, "Computers & Accessories");
        assert_eq!(record.selling_price, "54,990");
        assert_eq!(record.mrp, "₹71,332");
        assert_eq!(record.discount, "-23%");
        assert_eq!(record.description, "Fast");
        assert_eq!(record.weight, "1 kg 690 g");
        assert_eq!(record.image_url, "https://m.media-amazon.com/images/I/laptop.jpg");
        assert_eq!(record.specification.processor, "Core i5-1235U");
        assert_eq!(record.specification.ram, "16 GB");
        assert_eq!(record.specification.storage, NOT_AVAILABLE);
        assert_eq!(record.specification.graphics, "Intel Iris Xe Shared");
        assert_eq!(record.delivery_fee, "FREE");
        assert_eq!(record.delivery_time, "Tuesday, 21 May");
    }

    #[test]
    fn test_from_html_empty_page_uses_sentinels() {
        let record = ProductRecord::from_html("<html><body><p>Robot check</p></body></html>");
        assert_eq!(record.sku, None);
        for field in [
            &record.product_name,
            &record.product_title,
            &record.description,
            &record.category,
            &record.mrp,
            &record.selling_price,
            &record.weight,
            &record.brand_name,
            &record.image_url,
            &record.delivery_fee,
            &record.delivery_time,
        ] {
            assert_eq!(field, NOT_AVAILABLE);
        }
        assert_eq!(record.discount, "");
        assert_eq!(record.specification, Specification::default());
    }

    #[test]
    fn test_mrp_without_inner_span() {
        let page = r#"<span class="a-price a-text-price">₹71,332</span>
                      <tr class="po-model_name"><td>no span</td></tr>"#;
        let record = ProductRecord::from_html(page);
        assert_eq!(record.mrp, NOT_AVAILABLE);
        assert_eq!(record.product_name, NOT_AVAILABLE);
    }

    #[test]
    fn test_every_key_is_serialized() {
        let record = ProductRecord::from_html("");
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "sku",
            "productName",
            "productTitle",
            "description",
            "category",
            "mrp",
            "sellingPrice",
            "discount",
            "weight",
            "brandName",
            "imageUrl",
            "specification",
            "deliveryFee",
            "deliveryTime",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert!(object["sku"].is_null());
        let spec = object["specification"].as_object().unwrap();
        assert_eq!(spec.len(), 5);
        assert_eq!(spec["graphics"], NOT_AVAILABLE);
    }
}
