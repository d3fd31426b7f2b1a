//! Text and selector helpers shared by the listing and profile parsers

use crate::model::{Address, Region};
use crate::ParseError;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::OnceLock;

/// Parses a CSS selector, reporting the selector text on failure
pub fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css.to_string()))
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the normalized text content of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Returns `Some(text)` unless the text is empty
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Returns the first element matched by `css` inside `scope`
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

/// Returns every element matched by `css` inside `scope`
pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Tries each selector in order and returns the first match
pub fn select_any<'a>(scope: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|css| select_first(scope, css))
}

/// Text of the first element matched by any of `selectors`, if non-empty
pub fn text_of(scope: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    select_any(scope, selectors)
        .map(element_text)
        .and_then(non_empty)
}

/// Value of attribute `name` on `element`, trimmed and non-empty
pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// True unless an enclosing element also matches `cards`
///
/// Markup that nests one card class inside another would otherwise count a
/// single listing twice.
pub fn is_outermost(card: &ElementRef<'_>, cards: &Selector) -> bool {
    !card
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| cards.matches(&ancestor))
}

/// A text node that mentions one of a set of labels
pub struct LabelMatch<'a> {
    /// The label that matched
    pub label: &'static str,
    /// The normalized text of the node
    pub text: String,
    /// The element that contains the text node
    pub parent: Option<ElementRef<'a>>,
}

/// Finds the first text node under `scope` containing any of `labels`
///
/// Labels are tried in order for each node, so list longer labels before
/// their prefixes ("Mitarbeiteranzahl" before "Mitarbeiter").
pub fn find_label<'a>(scope: ElementRef<'a>, labels: &[&'static str]) -> Option<LabelMatch<'a>> {
    for node in scope.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let content: &str = text;
        if let Some(label) = labels.iter().copied().find(|label| content.contains(label)) {
            return Some(LabelMatch {
                label,
                text: normalize_whitespace(content),
                parent: node.parent().and_then(ElementRef::wrap),
            });
        }
    }
    None
}

/// Elements that start a new line of text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6", "li",
    "ol", "p", "section", "table", "td", "th", "tr", "ul",
];

/// Splits the text of `element` into lines at `<br>` and block elements
pub fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut lines = vec![String::new()];
    collect_lines(element, &mut lines);
    lines
        .iter()
        .map(|line| normalize_whitespace(line))
        .filter(|line| !line.is_empty())
        .collect()
}

fn collect_lines(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            if let Some(current) = lines.last_mut() {
                current.push_str(text);
                current.push(' ');
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if name == "br" {
                lines.push(String::new());
            } else if BLOCK_ELEMENTS.contains(&name) {
                lines.push(String::new());
                collect_lines(child, lines);
                lines.push(String::new());
            } else {
                collect_lines(child, lines);
            }
        }
    }
}

/// Text following `label` in `line`, without separators
fn value_after<'t>(line: &'t str, label: &str) -> &'t str {
    line.split_once(label)
        .map(|(_, rest)| rest)
        .unwrap_or_default()
        .trim_start_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
        .trim()
}

/// The line of the label's element that holds the label
fn line_with_label(found: &LabelMatch<'_>) -> String {
    found
        .parent
        .and_then(|parent| {
            text_lines(parent)
                .into_iter()
                .find(|line| line.contains(found.label))
        })
        .unwrap_or_else(|| found.text.clone())
}

/// Text of the first element after the label's element, if any
fn next_element_text(found: &LabelMatch<'_>) -> Option<String> {
    found
        .parent?
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// Reads a labelled fact such as `Gründungsjahr: 1987`
///
/// The value is the text following the label on the same line of the
/// label's element; a `<br>` or block element ends the line. When the
/// element holds only the label (`<dt>Gründungsjahr</dt>`), the next sibling
/// element supplies the value (`<dd>1987</dd>`).
pub fn labelled_value(scope: ElementRef<'_>, labels: &[&'static str]) -> Option<String> {
    let found = find_label(scope, labels)?;
    let line = line_with_label(&found);
    let after = value_after(&line, found.label);

    if !after.is_empty() {
        return Some(after.to_string());
    }
    next_element_text(&found)
}

/// Reads a fact whose label may follow the value, such as `50-99 Mitarbeiter`
///
/// The text node holding the label is returned as is. Only when that node is
/// the bare label does the value come from the rest of its line or from the
/// next sibling element.
pub fn labelled_text(scope: ElementRef<'_>, labels: &[&'static str]) -> Option<String> {
    let found = find_label(scope, labels)?;
    if !is_bare_label(&found.text, found.label) {
        return Some(found.text);
    }

    let line = line_with_label(&found);
    if !is_bare_label(&line, found.label) {
        return Some(line);
    }
    next_element_text(&found)
}

fn is_bare_label(text: &str, label: &str) -> bool {
    text.replacen(label, "", 1)
        .trim_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
        .is_empty()
}

fn year_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\b(1[6-9]\d{2}|20\d{2})\b").ok())
        .as_ref()
}

fn vat_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\b([A-Z]{2})\s?([0-9A-Z]{8,12})\b").ok())
        .as_ref()
}

fn postal_code_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(?:[A-Z]{1,2}-)?\d{4,5}$").ok())
        .as_ref()
}

/// First plausible four-digit year in `text`
pub fn parse_year(text: &str) -> Option<i32> {
    year_pattern()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First VAT identification number in `text`, spaces removed
///
/// The number part must contain at least one digit.
pub fn parse_vat_id(text: &str) -> Option<String> {
    vat_pattern()?.captures_iter(text).find_map(|caps| {
        let prefix = caps.get(1)?.as_str();
        let number = caps.get(2)?.as_str();
        if number.chars().any(|c| c.is_ascii_digit()) {
            Some(format!("{}{}", prefix, number))
        } else {
            None
        }
    })
}

fn is_postal_code(token: &str) -> bool {
    postal_code_pattern().is_some_and(|p| p.is_match(token))
}

/// Splits a printed address into its parts
///
/// Expected layout is `street, postal_code city, country`; the street and
/// country parts are optional. Country names are mapped to ISO codes and a
/// bare two-letter code is taken as is.
pub fn parse_address(full: &str) -> Address {
    let full = normalize_whitespace(full);
    if full.is_empty() {
        return Address::default();
    }

    let parts: Vec<&str> = full
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut address = Address {
        full: Some(full.clone()),
        ..Default::default()
    };
    if parts.is_empty() {
        return address;
    }

    let locality = parts.iter().position(|part| {
        part.split_whitespace()
            .next()
            .is_some_and(is_postal_code)
    });

    let (street_parts, locality_part, rest) = match locality {
        Some(i) => (&parts[..i], Some(parts[i]), &parts[i + 1..]),
        None if parts.len() >= 2 => (&parts[..1], Some(parts[1]), &parts[2..]),
        None => (&parts[..1], None, &parts[1..]),
    };

    if !street_parts.is_empty() {
        address.street = Some(street_parts.join(", "));
    }

    if let Some(locality) = locality_part {
        let mut tokens = locality.split_whitespace();
        match tokens.next() {
            Some(first) if is_postal_code(first) => {
                address.postal_code = Some(first.to_string());
                address.city = non_empty(tokens.collect::<Vec<_>>().join(" "));
            }
            _ => address.city = Some(locality.to_string()),
        }
    }

    if let Some(country) = rest.last() {
        address.country_code = country_code(country);
    }

    address
}

fn country_code(country: &str) -> Option<String> {
    if let Some(region) = Region::from_country_name(country) {
        return Some(region.code().to_string());
    }
    let last = country.split_whitespace().last()?;
    if last.len() == 2 && last.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(last.to_uppercase())
    } else {
        None
    }
}

/// Splits a contact's display name into first and last name
///
/// Leading salutations are dropped. A single remaining word is treated as
/// the first name.
pub fn split_name(full: &str) -> (Option<String>, Option<String>) {
    const SALUTATIONS: [&str; 6] = ["Herr", "Frau", "Mr.", "Mrs.", "Ms.", "Mr"];

    let tokens: Vec<&str> = full
        .split_whitespace()
        .skip_while(|t| SALUTATIONS.contains(t))
        .collect();

    match tokens.as_slice() {
        [] => (None, None),
        [only] => (Some(only.to_string()), None),
        [first, rest @ ..] => (Some(first.to_string()), Some(rest.join(" "))),
    }
}
