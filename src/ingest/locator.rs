//! Canonicalizes the shapes a published spreadsheet link comes in to its
//! CSV export form.

use url::Url;

const CSV_MARKERS: [&str; 2] = ["output=csv", "format=csv"];
const DOCUMENT_SEGMENT: &str = "/spreadsheets/d/";
const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Rewrite `url` into a fetchable CSV export link.
///
/// Total and idempotent: unknown shapes come back unchanged, and every
/// rewritten form carries a CSV marker so a second pass is a no-op.
pub fn normalize(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    if CSV_MARKERS.iter().any(|marker| url.contains(marker)) {
        return url.to_string();
    }

    if url.contains("/pubhtml") {
        return published_to_csv(url);
    }

    if url.contains(DOCUMENT_SEGMENT) && url.contains("/edit") {
        if let Some(document_id) = document_id(url) {
            return format!(
                "{}/{}/export?format=csv&gid={}",
                EXPORT_BASE,
                document_id,
                sheet_gid(url)
            );
        }
    }

    url.to_string()
}

/// `/pubhtml` becomes `/pub` with `output=csv` appended to the query.
fn published_to_csv(url: &str) -> String {
    let (address, fragment) = match url.split_once('#') {
        Some((address, fragment)) => (address, Some(fragment)),
        None => (url, None),
    };

    let base = address.replacen("/pubhtml", "/pub", 1);
    let joiner = if base.contains('?') { '&' } else { '?' };
    let mut out = format!("{}{}output=csv", base, joiner);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn document_id(url: &str) -> Option<&str> {
    let start = url.find(DOCUMENT_SEGMENT)? + DOCUMENT_SEGMENT.len();
    let rest = &url[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

/// Tab index from `?gid=`, else `#gid=<digits>`, else the first tab.
fn sheet_gid(url: &str) -> String {
    let from_query = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .query_pairs()
            .find(|(key, value)| key == "gid" && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    });

    from_query
        .or_else(|| fragment_gid(url))
        .unwrap_or_else(|| "0".to_string())
}

fn fragment_gid(url: &str) -> Option<String> {
    let start = url.find("#gid=")? + "#gid=".len();
    let digits: String = url[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (!digits.is_empty()).then_some(digits)
}
