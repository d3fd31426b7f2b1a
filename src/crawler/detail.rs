//! Company profile enrichment

use crate::crawler::Fetcher;
use crate::extract::parse_company_details;
use crate::model::{CompanyDetails, CompanyRecord, Language};
use crate::url::profile_url;
use crate::{FetchError, FetchResult};
use url::Url;

/// Fetches company profile pages and merges them into listing records
pub struct DetailFetcher<'a> {
    fetcher: &'a Fetcher,
    base_url: &'a Url,
    language: Language,
}

impl<'a> DetailFetcher<'a> {
    pub fn new(fetcher: &'a Fetcher, base_url: &'a Url, language: Language) -> Self {
        Self {
            fetcher,
            base_url,
            language,
        }
    }

    /// Profile URL for a record
    ///
    /// The link captured from the listing card is preferred; otherwise the
    /// URL is derived from the company identifier.
    pub fn detail_url(&self, record: &CompanyRecord) -> Result<String, url::ParseError> {
        match &record.profile_url {
            Some(url) => Ok(url.clone()),
            None => profile_url(self.base_url, self.language, &record.company_id)
                .map(|url| url.to_string()),
        }
    }

    /// Fetches and parses the profile page of a record
    pub async fn fetch_details(&self, record: &CompanyRecord) -> FetchResult<CompanyDetails> {
        let url = self.detail_url(record).map_err(|e| FetchError::Request {
            url: record.company_id.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!("Fetching profile of {}: {}", record.company_id, url);
        let body = self.fetcher.get_text(&url).await?;
        Ok(parse_company_details(&body, self.base_url))
    }

    /// Fetches a record's profile and merges it in
    ///
    /// On failure the record is left unchanged and false is returned.
    pub async fn enrich(&self, record: &mut CompanyRecord) -> bool {
        match self.fetch_details(record).await {
            Ok(details) => {
                record.merge_details(details);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Keeping listing fields only for company {}: {}",
                    record.company_id,
                    e
                );
                false
            }
        }
    }
}
