//! URL handling for the marketplace
//!
//! This module builds search and profile URLs and turns the hrefs found in
//! listing markup into absolute URLs, identifiers and contact values.

mod resolve;
mod search;

pub use resolve::{identifier_from_href, is_external, resolve_href, strip_scheme};
pub use search::{profile_url, search_url};
