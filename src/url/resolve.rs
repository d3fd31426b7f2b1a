use url::Url;

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None if the link should be ignored:
/// - javascript:, mailto:, tel:, data: schemes
/// - fragment-only links
/// - hrefs that do not resolve to http or https
pub fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base.join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute.to_string())
    } else {
        None
    }
}

/// Derives a listing identifier from a profile link
///
/// Profile paths end in `<slug>-<id>`, e.g. `/de/firma/muster-gmbh-123456`
/// yields `123456`. A path without a dash yields its last segment.
pub fn identifier_from_href(href: &str) -> Option<String> {
    let path = href
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let last_segment = path.trim_matches('/').rsplit('/').next()?;
    let id = last_segment.rsplit('-').next()?.trim();

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Extracts the address from a `mailto:` or `tel:` href
///
/// Any `?subject=...` suffix is dropped.
pub fn strip_scheme(href: &str, scheme: &str) -> Option<String> {
    let rest = href.trim().strip_prefix(scheme)?;
    let value = rest.split('?').next().unwrap_or_default().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Returns true if `href` points away from the marketplace itself
///
/// Hosts are compared case-insensitively with any leading `www.` removed.
pub fn is_external(href: &str, base: &Url) -> bool {
    let Ok(url) = Url::parse(href.trim()) else {
        return false;
    };
    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }
    match (url.host_str(), base.host_str()) {
        (Some(host), Some(site)) => bare_host(host) != bare_host(site),
        _ => false,
    }
}

fn bare_host(host: &str) -> String {
    let host = host.to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}
