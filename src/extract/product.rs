//! Product listing extraction

use super::text::{attr, is_outermost, select_all, selector, text_of};
use super::ExtractedPage;
use crate::model::{ProductRecord, Region};
use crate::url::{identifier_from_href, is_external, resolve_href};
use crate::ParseError;
use scraper::{ElementRef, Html};
use url::Url;

const CARD_SELECTOR: &str =
    "[data-test='product-result-card'], article.product-item, div.product-card";

const PRODUCT_LINK_SELECTORS: &[&str] = &[
    "a[data-test='product-link']",
    "a[href*='/produkte/']",
    "a[href*='/produkt/']",
];
const COMPANY_LINK_SELECTORS: &[&str] = &[
    "a[data-test='company-link']",
    "a[href*='/firma/']",
    "a[href*='/firmen/']",
];

/// Extracts product records from a search result page
///
/// A card without a derivable product identifier is skipped. The supplying
/// company's name, link and identifier are captured when the card shows them.
pub fn parse_product_list(
    html: &str,
    base_url: &Url,
    region: Region,
) -> Result<ExtractedPage<ProductRecord>, ParseError> {
    let document = Html::parse_document(html);
    let cards = selector(CARD_SELECTOR)?;

    let mut page = ExtractedPage::default();
    for card in document.select(&cards).filter(|card| is_outermost(card, &cards)) {
        page.listings += 1;
        match parse_product_card(card, base_url, region) {
            Ok(record) => page.records.push(record),
            Err(e) => {
                tracing::debug!("Skipping product card: {}", e);
                page.skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Extracted {} products from {} cards ({} skipped)",
        page.records.len(),
        page.listings,
        page.skipped
    );

    Ok(page)
}

fn parse_product_card(
    card: ElementRef<'_>,
    base_url: &Url,
    region: Region,
) -> Result<ProductRecord, ParseError> {
    let name = text_of(card, &["[data-test='product-name']", "h2", "h3"]);
    let product_link = internal_link(card, PRODUCT_LINK_SELECTORS, base_url);
    let company_link = internal_link(card, COMPANY_LINK_SELECTORS, base_url);

    let product_id = attr(card, "data-id")
        .or_else(|| attr(card, "data-product-id"))
        .or_else(|| product_link.and_then(|a| attr(a, "data-id")))
        .or_else(|| href_of(product_link).and_then(identifier_from_href))
        .ok_or_else(|| {
            ParseError::MalformedListing(format!(
                "no identifier for product card '{}'",
                name.as_deref().unwrap_or("<unnamed>")
            ))
        })?;

    Ok(ProductRecord {
        product_id,
        name,
        company_id: attr(card, "data-company-id")
            .or_else(|| company_link.and_then(|a| attr(a, "data-id")))
            .or_else(|| href_of(company_link).and_then(identifier_from_href)),
        company_name: text_of(card, &["[data-test='company-name']", ".company-name"]),
        product_url: href_of(product_link).and_then(|href| resolve_href(href, base_url)),
        company_url: href_of(company_link).and_then(|href| resolve_href(href, base_url)),
        region: text_of(card, &["[data-test='company-region']", ".region"])
            .or_else(|| Some(region.code().to_string())),
        description: text_of(card, &["[data-test='product-description']", ".description"]),
    })
}

fn href_of(link: Option<ElementRef<'_>>) -> Option<&str> {
    link.and_then(|a| a.value().attr("href"))
}

fn internal_link<'a>(
    card: ElementRef<'a>,
    selectors: &[&str],
    base_url: &Url,
) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|css| {
        select_all(card, css).into_iter().find(|a| {
            a.value()
                .attr("href")
                .and_then(|href| resolve_href(href, base_url))
                .is_some_and(|url| !is_external(&url, base_url))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.wlw.de").unwrap()
    }

    #[test]
    fn test_parse_product_list() {
        let html = r#"
            <div data-test="product-result-card">
              <h3 data-test="product-name">Edelstahl Treppe</h3>
              <a data-test="product-link" href="/de/produkte/edelstahl-treppe-5001">Details</a>
              <span data-test="company-name">Muster Metallbau GmbH</span>
              <a data-test="company-link" href="/de/firma/muster-metallbau-gmbh-123456">Anbieter</a>
              <p class="description">Gerade und gewendelte Treppen</p>
            </div>
            <article class="product-item">
              <h3>Ohne Kennung</h3>
            </article>
        "#;

        let page = parse_product_list(html, &base(), Region::Ch).unwrap();
        assert_eq!(page.listings, 2);
        assert_eq!(page.skipped, 1);

        let product = &page.records[0];
        assert_eq!(product.product_id, "5001");
        assert_eq!(product.name.as_deref(), Some("Edelstahl Treppe"));
        assert_eq!(product.company_id.as_deref(), Some("123456"));
        assert_eq!(product.company_name.as_deref(), Some("Muster Metallbau GmbH"));
        assert_eq!(
            product.product_url.as_deref(),
            Some("https://www.wlw.de/de/produkte/edelstahl-treppe-5001")
        );
        assert_eq!(
            product.company_url.as_deref(),
            Some("https://www.wlw.de/de/firma/muster-metallbau-gmbh-123456")
        );
        assert_eq!(product.region.as_deref(), Some("CH"));
        assert_eq!(
            product.description.as_deref(),
            Some("Gerade und gewendelte Treppen")
        );
    }

    #[test]
    fn test_card_attribute_identifier_wins() {
        let html = r#"<div class="product-card" data-product-id="p-9"><h2>Gitterroste</h2></div>"#;
        let page = parse_product_list(html, &base(), Region::De).unwrap();

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].product_id, "p-9");
        assert!(page.records[0].company_id.is_none());
    }

    #[test]
    fn test_nested_card_counts_once() {
        let html = r#"
            <article class="product-item">
              <div class="product-card">
                <h3>Gitterroste</h3>
                <a href="/de/produkte/gitterroste-42">Details</a>
              </div>
            </article>
        "#;
        let page = parse_product_list(html, &base(), Region::De).unwrap();

        assert_eq!(page.listings, 1);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].product_id, "42");
    }
}
