//! Output record types
//!
//! Records are created by the extractor from one listing card. The only
//! mutation after creation is `CompanyRecord::merge_details`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Postal address of a company
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    /// The address as printed on the page
    pub full: Option<String>,
}

impl Address {
    /// Returns true if no part of the address is known
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.country_code.is_none()
            && self.full.is_none()
    }

    /// Fills unset parts from `other`
    fn fill_from(&mut self, other: Address) {
        fill(&mut self.street, other.street);
        fill(&mut self.postal_code, other.postal_code);
        fill(&mut self.city, other.city);
        fill(&mut self.country_code, other.country_code);
        fill(&mut self.full, other.full);
    }
}

/// A contact person listed on a company profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// A product mentioned by a company
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: Option<String>,
    pub name: String,
}

/// One company listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub company_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub homepage: Option<String>,
    pub address: Address,
    pub founding_year: Option<i32>,
    pub employee_count: Option<String>,
    pub description: Option<String>,
    pub products: Vec<ProductRef>,
    pub region: Option<String>,
    pub logo_url: Option<String>,
    pub contacts: Vec<Contact>,
    pub certificates: BTreeSet<String>,
    pub vat_id: Option<String>,
    pub profile_url: Option<String>,
}

/// Extended fields read from a company profile page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyDetails {
    pub name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub homepage: Option<String>,
    pub address: Address,
    pub employee_count: Option<String>,
    pub founding_year: Option<i32>,
    pub vat_id: Option<String>,
    pub products: Vec<ProductRef>,
    pub contacts: Vec<Contact>,
    pub certificates: BTreeSet<String>,
}

impl CompanyRecord {
    /// Creates a record with only the identifier set
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            ..Default::default()
        }
    }

    /// Merges profile fields into this record
    ///
    /// Scalar fields already known from the listing are kept; unset ones are
    /// filled from the profile. The profile's contact, certificate and product
    /// lists replace the listing's when non-empty, and its VAT ID always wins.
    /// Merging the same details twice gives the same record as merging once.
    pub fn merge_details(&mut self, details: CompanyDetails) {
        fill(&mut self.name, details.name);
        fill(&mut self.description, details.description);
        fill(&mut self.email, details.email);
        fill(&mut self.phone_number, details.phone_number);
        fill(&mut self.homepage, details.homepage);
        fill(&mut self.employee_count, details.employee_count);
        fill(&mut self.founding_year, details.founding_year);
        self.address.fill_from(details.address);

        if details.vat_id.is_some() {
            self.vat_id = details.vat_id;
        }
        if !details.contacts.is_empty() {
            self.contacts = details.contacts;
        }
        if !details.certificates.is_empty() {
            self.certificates = details.certificates;
        }
        if !details.products.is_empty() {
            self.products = details.products;
        }
    }
}

/// One product listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub name: Option<String>,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub product_url: Option<String>,
    pub company_url: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
}

/// An output record, serialized under a key naming its mode
///
/// `{"company": {...}}` or `{"product": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Record {
    Company(CompanyRecord),
    Product(ProductRecord),
}

impl Record {
    /// Returns the identifier used for deduplication
    pub fn identifier(&self) -> &str {
        match self {
            Self::Company(c) => &c.company_id,
            Self::Product(p) => &p.product_id,
        }
    }
}

impl From<CompanyRecord> for Record {
    fn from(record: CompanyRecord) -> Self {
        Self::Company(record)
    }
}

impl From<ProductRecord> for Record {
    fn from(record: ProductRecord) -> Self {
        Self::Product(record)
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}
