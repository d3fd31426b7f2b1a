use crate::model::{Language, SearchQuery};
use url::Url;

/// Builds the URL of one search result page
///
/// Layout: `{base}/{language}/{firmen|produkte}/?q={query}&page={n}&country={region}`
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wlw_scraper::model::{Language, Mode, Region, SearchQuery};
/// use wlw_scraper::url::search_url;
///
/// let base = Url::parse("https://www.wlw.de").unwrap();
/// let query = SearchQuery {
///     query: "Metallbau".to_string(),
///     mode: Mode::Company,
///     region: Region::De,
///     language: Language::De,
///     max_pages: 1,
///     include_details: false,
/// };
/// let url = search_url(&base, &query, 2).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.wlw.de/de/firmen/?q=Metallbau&page=2&country=DE"
/// );
/// ```
pub fn search_url(base: &Url, query: &SearchQuery, page: u32) -> Result<Url, url::ParseError> {
    let path = format!(
        "/{}/{}/",
        query.language.code(),
        query.mode.path_segment()
    );
    let mut url = base.join(&path)?;
    url.query_pairs_mut()
        .append_pair("q", &query.query)
        .append_pair("page", &page.to_string())
        .append_pair("country", query.region.code());
    Ok(url)
}

/// Derives a company profile URL from its identifier
///
/// Used when a listing card carried no profile link.
pub fn profile_url(base: &Url, language: Language, company_id: &str) -> Result<Url, url::ParseError> {
    base.join(&format!("/{}/firma/{}", language.code(), company_id))
}
