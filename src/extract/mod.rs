//! Field extraction from marketplace markup
//!
//! This module maps fetched HTML into records:
//! - Company search result pages into `CompanyRecord`s
//! - Product search result pages into `ProductRecord`s
//! - Company profile pages into `CompanyDetails`
//!
//! Listing cards that yield no identifier are counted as skipped instead of
//! failing the page. Optional fields that cannot be found stay unset.

mod company;
mod product;
mod text;

pub use company::{parse_company_details, parse_company_list};
pub use product::parse_product_list;
pub use text::{normalize_whitespace, parse_address, split_name};

/// Records extracted from one search result page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage<T> {
    /// Records in page order
    pub records: Vec<T>,

    /// Listing cards dropped because no identifier could be derived
    pub skipped: usize,

    /// Listing cards found on the page, including skipped ones
    pub listings: usize,
}

impl<T> Default for ExtractedPage<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            listings: 0,
        }
    }
}

impl<T> ExtractedPage<T> {
    /// Returns true if the page held no listing cards at all
    pub fn is_empty(&self) -> bool {
        self.listings == 0
    }

    /// Converts the records into another record type
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ExtractedPage<U> {
        ExtractedPage {
            records: self.records.into_iter().map(f).collect(),
            skipped: self.skipped,
            listings: self.listings,
        }
    }
}
