//! Company listing and profile extraction

use super::text::{
    attr, element_text, find_label, is_outermost, labelled_text, labelled_value, parse_address,
    parse_vat_id, parse_year, select_all, select_first, selector, split_name, text_of,
};
use super::ExtractedPage;
use crate::model::{CompanyDetails, CompanyRecord, Contact, ProductRef, Region};
use crate::url::{identifier_from_href, is_external, resolve_href, strip_scheme};
use crate::ParseError;
use scraper::{ElementRef, Html};
use std::collections::BTreeSet;
use url::Url;

const CARD_SELECTOR: &str =
    "[data-test='company-result-card'], article.company-item, div.company-card";

const NAME_SELECTORS: &[&str] = &["[data-test='company-name']", "h2", "h3"];
const PROFILE_NAME_SELECTORS: &[&str] = &["[data-test='company-name']", "h1", "h2"];
const LINK_SELECTORS: &[&str] = &[
    "a[data-test='company-link']",
    "a[href*='/firma/']",
    "a[href*='/firmen/']",
    "a[href]",
];
const ADDRESS_SELECTORS: &[&str] = &["[data-test='company-address']", ".address", "address"];
const DESCRIPTION_SELECTORS: &[&str] = &["[data-test='company-description']", ".description"];
const REGION_SELECTORS: &[&str] = &["[data-test='company-region']", ".region"];
const CONTACT_SELECTOR: &str = "[data-test='contact-person'], .contact-person";
const PRODUCT_SELECTOR: &str = "[data-test='product-name'], .product-list li, section.products li";

const EMPLOYEE_LABELS: &[&str] = &[
    "Mitarbeiteranzahl",
    "Mitarbeiter",
    "Number of employees",
    "employees",
    "Employees",
];
const FOUNDED_LABELS: &[&str] = &["Gründungsjahr", "Year of foundation", "Founded", "founded"];
const VAT_LABELS: &[&str] = &["USt-IdNr", "USt-ID", "Umsatzsteuer-ID", "VAT ID", "VAT"];
const CERTIFICATE_LABELS: &[&str] = &[
    "Zertifizierungen",
    "Zertifikate",
    "Certificates",
    "Certifications",
];

/// Extracts company records from a search result page
///
/// # Arguments
///
/// * `html` - The page body
/// * `base_url` - The marketplace base URL, used to resolve relative links
/// * `region` - The searched region, recorded when a card names none
///
/// # Returns
///
/// * `Ok(ExtractedPage)` - Records in page order plus listing and skip counts
/// * `Err(ParseError)` - The card selector could not be compiled
pub fn parse_company_list(
    html: &str,
    base_url: &Url,
    region: Region,
) -> Result<ExtractedPage<CompanyRecord>, ParseError> {
    let document = Html::parse_document(html);
    let cards = selector(CARD_SELECTOR)?;

    let mut page = ExtractedPage::default();
    for card in document.select(&cards).filter(|card| is_outermost(card, &cards)) {
        page.listings += 1;
        match parse_company_card(card, base_url, region) {
            Ok(record) => page.records.push(record),
            Err(e) => {
                tracing::debug!("Skipping company card: {}", e);
                page.skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Extracted {} companies from {} cards ({} skipped)",
        page.records.len(),
        page.listings,
        page.skipped
    );

    Ok(page)
}

fn parse_company_card(
    card: ElementRef<'_>,
    base_url: &Url,
    region: Region,
) -> Result<CompanyRecord, ParseError> {
    let name = text_of(card, NAME_SELECTORS);
    let link = profile_link(card, base_url);

    let company_id = attr(card, "data-id")
        .or_else(|| attr(card, "data-company-id"))
        .or_else(|| link.and_then(|a| attr(a, "data-id")))
        .or_else(|| {
            link.and_then(|a| a.value().attr("href"))
                .and_then(identifier_from_href)
        })
        .ok_or_else(|| {
            ParseError::MalformedListing(format!(
                "no identifier for company card '{}'",
                name.as_deref().unwrap_or("<unnamed>")
            ))
        })?;

    let mut record = CompanyRecord::new(company_id);
    record.name = name;
    record.profile_url = link
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_href(href, base_url));
    record.email = contact_value(card, "mailto:");
    record.phone_number = contact_value(card, "tel:");
    record.homepage = homepage(card, base_url);
    record.address = text_of(card, ADDRESS_SELECTORS)
        .map(|full| parse_address(&full))
        .unwrap_or_default();
    record.employee_count = labelled_text(card, EMPLOYEE_LABELS);
    record.description = text_of(card, DESCRIPTION_SELECTORS);
    record.logo_url = select_first(card, "img[src]")
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| resolve_href(src, base_url));
    record.region = text_of(card, REGION_SELECTORS).or_else(|| Some(region.code().to_string()));

    Ok(record)
}

/// First link that points to a page on the marketplace itself
fn profile_link<'a>(card: ElementRef<'a>, base_url: &Url) -> Option<ElementRef<'a>> {
    LINK_SELECTORS.iter().find_map(|css| {
        select_all(card, css).into_iter().find(|a| {
            a.value()
                .attr("href")
                .and_then(|href| resolve_href(href, base_url))
                .is_some_and(|url| !is_external(&url, base_url))
        })
    })
}

/// Value of the first `mailto:` or `tel:` link in scope
fn contact_value(scope: ElementRef<'_>, scheme: &str) -> Option<String> {
    let css = format!("a[href^='{}']", scheme);
    select_first(scope, &css)
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| strip_scheme(href, scheme))
}

/// First absolute link leaving the marketplace
fn homepage(scope: ElementRef<'_>, base_url: &Url) -> Option<String> {
    select_all(scope, "a[href^='http']")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .find(|href| is_external(href, base_url))
        .map(|href| href.trim().to_string())
}

/// Extracts the extended fields of a company profile page
///
/// Every field is optional; a page without any recognizable content yields
/// empty details rather than an error.
pub fn parse_company_details(html: &str, base_url: &Url) -> CompanyDetails {
    let document = Html::parse_document(html);
    let root = document.root_element();

    CompanyDetails {
        name: text_of(root, PROFILE_NAME_SELECTORS),
        description: text_of(
            root,
            &[
                "[data-test='company-description']",
                "section.description",
                ".description",
            ],
        ),
        email: contact_value(root, "mailto:"),
        phone_number: contact_value(root, "tel:"),
        homepage: homepage(root, base_url),
        address: text_of(root, &["[data-test='company-address']", "address", ".address"])
            .map(|full| parse_address(&full))
            .unwrap_or_default(),
        employee_count: labelled_value(root, EMPLOYEE_LABELS),
        founding_year: labelled_value(root, FOUNDED_LABELS).and_then(|v| parse_year(&v)),
        vat_id: labelled_value(root, VAT_LABELS).and_then(|v| parse_vat_id(&v)),
        products: parse_profile_products(root),
        contacts: parse_contacts(root),
        certificates: parse_certificates(root),
    }
}

fn parse_contacts(root: ElementRef<'_>) -> Vec<Contact> {
    select_all(root, CONTACT_SELECTOR)
        .into_iter()
        .filter_map(|block| {
            let (first_name, last_name) = text_of(block, &["h3", "h4", ".name"])
                .map(|name| split_name(&name))
                .unwrap_or_default();
            let contact = Contact {
                first_name,
                last_name,
                email: contact_value(block, "mailto:"),
                role: text_of(block, &[".role", ".position"]),
            };
            if contact == Contact::default() {
                None
            } else {
                Some(contact)
            }
        })
        .collect()
}

fn parse_certificates(root: ElementRef<'_>) -> BTreeSet<String> {
    let tagged: BTreeSet<String> = select_all(root, "[data-test='certificate']")
        .into_iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();
    if !tagged.is_empty() {
        return tagged;
    }

    let Some(heading) = find_label(root, CERTIFICATE_LABELS).and_then(|found| found.parent) else {
        return BTreeSet::new();
    };

    // the list usually sits next to the heading, so look a couple of levels up
    std::iter::once(heading)
        .chain(heading.ancestors().filter_map(ElementRef::wrap))
        .take(3)
        .map(|container| {
            select_all(container, "li")
                .into_iter()
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect::<BTreeSet<_>>()
        })
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

fn parse_profile_products(root: ElementRef<'_>) -> Vec<ProductRef> {
    let mut seen = BTreeSet::new();
    let mut products = Vec::new();

    for item in select_all(root, PRODUCT_SELECTOR) {
        let name = element_text(item);
        if name.is_empty() || !seen.insert(name.clone()) {
            continue;
        }

        let link = if item.value().name() == "a" {
            Some(item)
        } else {
            select_first(item, "a[href]")
        };
        let product_id = attr(item, "data-id").or_else(|| {
            link.and_then(|a| a.value().attr("href"))
                .and_then(identifier_from_href)
        });

        products.push(ProductRef { product_id, name });
    }

    products
}
