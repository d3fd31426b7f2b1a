//! Pagination walker
//!
//! Walks the search result pages strictly forward from page 1, one request at
//! a time. The walk ends when a page holds no listings, when the next page
//! would exceed the page limit, or when a page cannot be fetched.

use crate::crawler::Fetcher;
use crate::model::SearchQuery;
use crate::url::search_url;
use crate::FetchError;
use std::fmt;
use url::Url;

/// One fetched search result page
#[derive(Debug, Clone)]
pub struct RawPage {
    /// 1-based page index
    pub number: u32,
    pub url: String,
    pub body: String,
}

/// Why a walk ended
#[derive(Debug)]
pub enum Termination {
    /// The page held no listings
    EmptyPage { page: u32 },

    /// The next page would exceed the configured maximum
    PageLimit { max: u32 },

    /// The page could not be fetched within the retry budget
    FetchFailed { page: u32, error: FetchError },
}

impl Termination {
    /// Returns true if the walk stopped before the results ran out
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    /// Returns a short machine-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPage { .. } => "empty-page",
            Self::PageLimit { .. } => "page-limit",
            Self::FetchFailed { .. } => "fetch-failed",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPage { page } => write!(f, "page {} had no listings", page),
            Self::PageLimit { max } => write!(f, "page limit of {} reached", max),
            Self::FetchFailed { page, error } => {
                write!(f, "page {} could not be fetched: {}", page, error)
            }
        }
    }
}

/// Lazy, finite sequence of search result pages
///
/// Call [`PageWalker::next_page`] for each page and report the number of
/// listings found on it through [`PageWalker::observe_listings`].
pub struct PageWalker<'a> {
    fetcher: &'a Fetcher,
    query: &'a SearchQuery,
    base_url: &'a Url,
    next: u32,
    pages_fetched: u32,
    termination: Option<Termination>,
}

impl<'a> PageWalker<'a> {
    pub fn new(fetcher: &'a Fetcher, query: &'a SearchQuery, base_url: &'a Url) -> Self {
        Self {
            fetcher,
            query,
            base_url,
            next: 1,
            pages_fetched: 0,
            termination: None,
        }
    }

    /// Fetches the next page, or returns None once the walk has ended
    pub async fn next_page(&mut self) -> Option<RawPage> {
        if self.termination.is_some() {
            return None;
        }

        let page = self.next;
        if !self.query.allows_page(page) {
            tracing::info!("Stopping after {} page(s): page limit reached", self.pages_fetched);
            self.termination = Some(Termination::PageLimit {
                max: self.query.max_pages,
            });
            return None;
        }

        let url = match search_url(self.base_url, self.query, page) {
            Ok(url) => url,
            Err(e) => {
                self.fail(
                    page,
                    FetchError::Request {
                        url: self.base_url.to_string(),
                        message: e.to_string(),
                    },
                );
                return None;
            }
        };

        tracing::info!("Fetching result page {}: {}", page, url);
        match self.fetcher.get_text(url.as_str()).await {
            Ok(body) => {
                self.pages_fetched += 1;
                self.next += 1;
                Some(RawPage {
                    number: page,
                    url: url.to_string(),
                    body,
                })
            }
            Err(error) => {
                self.fail(page, error);
                None
            }
        }
    }

    /// Records the number of listings found on the last fetched page
    ///
    /// Zero listings end the walk.
    pub fn observe_listings(&mut self, count: usize) {
        if count > 0 || self.termination.is_some() || self.pages_fetched == 0 {
            return;
        }
        let page = self.next - 1;
        tracing::info!("Page {} has no listings, stopping", page);
        self.termination = Some(Termination::EmptyPage { page });
    }

    /// Why the walk ended, if it has
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    /// Consumes the walker and returns why it ended
    pub fn into_termination(self) -> Option<Termination> {
        self.termination
    }

    /// Number of pages fetched successfully
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    fn fail(&mut self, page: u32, error: FetchError) {
        tracing::warn!("Ending walk at page {}: {}", page, error);
        self.termination = Some(Termination::FetchFailed { page, error });
    }
}
