use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::product::{clean, NOT_AVAILABLE};

static TH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static VALUE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.a-size-base.prodDetAttrValue").unwrap());

// "Graphics Coprocessor" and "Graphics Card Ram Size" would satisfy these two unanchored.
pub(crate) static PROCESSOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^Processor").unwrap());
pub(crate) static RAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^RAM\s*Size").unwrap());

pub(crate) static WEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Item\s*Weight").unwrap());
pub(crate) static STORAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Hard\s*Drive\s*Size").unwrap());
pub(crate) static DISPLAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Resolution").unwrap());
pub(crate) static GRAPHICS_RAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Graphics\s*Card\s*Ram\s*Size").unwrap());
pub(crate) static GRAPHICS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Graphics\s*Coprocessor").unwrap());

/// Hardware summary of a laptop, read from the technical details table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub processor: String,
    pub ram: String,
    pub storage: String,
    pub display: String,
    /// Graphics model followed by its memory size.
    pub graphics: String,
}

impl Default for Specification {
    fn default() -> Self {
        Self {
            processor: NOT_AVAILABLE.into(),
            ram: NOT_AVAILABLE.into(),
            storage: NOT_AVAILABLE.into(),
            display: NOT_AVAILABLE.into(),
            graphics: NOT_AVAILABLE.into(),
        }
    }
}

impl Specification {
    pub(crate) fn from_document(document: &Html) -> Self {
        let graphics = join_present(&[
            row_value(document, &GRAPHICS),
            row_value(document, &GRAPHICS_RAM),
        ]);
        Self {
            processor: row_value(document, &PROCESSOR).unwrap_or_else(|| NOT_AVAILABLE.into()),
            ram: row_value(document, &RAM).unwrap_or_else(|| NOT_AVAILABLE.into()),
            storage: row_value(document, &STORAGE).unwrap_or_else(|| NOT_AVAILABLE.into()),
            display: row_value(document, &DISPLAY).unwrap_or_else(|| NOT_AVAILABLE.into()),
            graphics,
        }
    }
}

/// Finds the first table header whose label matches `label` and reads the
/// value cell of the same row.
///
/// Returns `None` when the header, its row, or the value cell is missing.
pub(crate) fn row_value(document: &Html, label: &Regex) -> Option<String> {
    let header = document
        .select(&TH_SELECTOR)
        .find(|th| label.is_match(&clean(&th.text().collect::<String>())))?;
    let row = header
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|elem| elem.value().name() == "tr")?;
    let cell = row.select(&VALUE_SELECTOR).next()?;
    Some(
        cell.text()
            .map(clean)
            .filter(|t| !t.is_empty())
            .collect::<String>(),
    )
}

fn join_present(parts: &[Option<String>]) -> String {
    let joined = parts
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        NOT_AVAILABLE.into()
    } else {
        joined
    }
}
