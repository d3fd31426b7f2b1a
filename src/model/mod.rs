//! Data model for searches and extracted records
//!
//! # Components
//!
//! - `SearchQuery` with its `Mode`, `Region` and `Language` enums
//! - `CompanyRecord` / `ProductRecord` and their nested types
//! - `Record`, the mode-tagged wrapper written to the output file

mod query;
mod record;

pub use query::{Language, Mode, Region, SearchQuery};
pub use record::{
    Address, CompanyDetails, CompanyRecord, Contact, ProductRecord, ProductRef, Record,
};
