//! Search query definitions
//!
//! A `SearchQuery` is assembled once from the effective configuration and is
//! never modified while a run is in progress.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of listing a run collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Company search results (`/firmen/`)
    Company,
    /// Product search results (`/produkte/`)
    Product,
}

impl Mode {
    /// Returns the lowercase name used in config files and output keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Product => "product",
        }
    }

    /// Returns the path segment the marketplace uses for this search type
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Company => "firmen",
            Self::Product => "produkte",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "product" => Ok(Self::Product),
            other => Err(format!("unknown mode '{}', expected company or product", other)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Marketplace region (country filter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// Germany
    De,
    /// Austria
    At,
    /// Switzerland
    Ch,
    /// Belgium
    Be,
    /// Luxembourg
    Lu,
}

impl Region {
    /// Returns the ISO 3166-1 alpha-2 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::De => "DE",
            Self::At => "AT",
            Self::Ch => "CH",
            Self::Be => "BE",
            Self::Lu => "LU",
        }
    }

    /// Maps a country name as printed in addresses to a region
    ///
    /// Both German and English spellings are recognised, as well as the
    /// bare two-letter code.
    pub fn from_country_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "de" | "deutschland" | "germany" => Some(Self::De),
            "at" | "österreich" | "oesterreich" | "austria" => Some(Self::At),
            "ch" | "schweiz" | "switzerland" | "suisse" => Some(Self::Ch),
            "be" | "belgien" | "belgium" | "belgique" => Some(Self::Be),
            "lu" | "luxemburg" | "luxembourg" => Some(Self::Lu),
            _ => None,
        }
    }

    /// Returns all supported regions
    pub fn all() -> [Self; 5] {
        [Self::De, Self::At, Self::Ch, Self::Be, Self::Lu]
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Self::all()
            .into_iter()
            .find(|region| region.code() == code)
            .ok_or_else(|| format!("unknown region '{}', expected one of DE, AT, CH, BE, LU", s))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Site language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
}

impl Language {
    /// Returns the language path segment, e.g. `de`
    pub fn code(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            other => Err(format!("unknown language '{}', expected de or en", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The parameters of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text search term
    pub query: String,

    /// Company or product search
    pub mode: Mode,

    /// Country filter
    pub region: Region,

    /// Site language
    pub language: Language,

    /// Maximum number of result pages to fetch; 0 means unlimited
    pub max_pages: u32,

    /// Whether company profile pages are fetched and merged
    pub include_details: bool,
}

impl SearchQuery {
    /// Returns true if page `page` (1-based) is within the page limit
    pub fn allows_page(&self, page: u32) -> bool {
        self.max_pages == 0 || page <= self.max_pages
    }

    /// Returns true if the run should fetch company profile pages
    ///
    /// Product listings have no profile step.
    pub fn fetches_details(&self) -> bool {
        self.include_details && self.mode == Mode::Company
    }
}
