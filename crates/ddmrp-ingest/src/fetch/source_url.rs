//! Derivation of the flat-file export URL from a pasted spreadsheet link.

use reqwest::Url;

use crate::error::FetchError;

/// Host serving the trade matrix spreadsheets.
pub const SHEETS_HOST: &str = "docs.google.com";

/// Sheet (tab) identifier from the query string or the `#gid=` fragment.
fn sheet_gid(url: &Url) -> Option<String> {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "gid")
        .map(|(_, value)| value.into_owned());
    let from_fragment = || {
        url.fragment().and_then(|fragment| {
            fragment
                .split('&')
                .find_map(|part| part.strip_prefix("gid="))
                .map(str::to_string)
        })
    };
    from_query
        .or_else(from_fragment)
        .filter(|gid| !gid.is_empty() && gid.chars().all(|ch| ch.is_ascii_digit()))
}

/// Turns an interactive spreadsheet link into its CSV export URL.
///
/// `https://docs.google.com/spreadsheets/d/<ID>/edit?gid=7#gid=7` becomes
/// `https://docs.google.com/spreadsheets/d/<ID>/export?format=csv&gid=7`.
/// Published links (`/d/e/<ID>/pubhtml`) become `/pub?output=csv`.
/// The result depends only on the spreadsheet id and the sheet gid, so
/// export links map to themselves.
pub fn export_url(raw: &str) -> Result<String, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidSource("empty URL".to_string()));
    }
    let url = Url::parse(trimmed)
        .map_err(|err| FetchError::InvalidSource(format!("{trimmed}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidSource(format!(
            "{trimmed}: unsupported scheme {}",
            url.scheme()
        )));
    }
    if url.host_str() != Some(SHEETS_HOST) {
        return Err(FetchError::InvalidSource(format!(
            "{trimmed}: expected host {SHEETS_HOST}"
        )));
    }
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default();
    let gid_suffix = sheet_gid(&url)
        .map(|gid| format!("&gid={gid}"))
        .unwrap_or_default();
    match segments.as_slice() {
        ["spreadsheets", "d", "e", published, ..] => Ok(format!(
            "https://{SHEETS_HOST}/spreadsheets/d/e/{published}/pub?output=csv{gid_suffix}"
        )),
        ["spreadsheets", "d", id, ..] if *id != "e" => Ok(format!(
            "https://{SHEETS_HOST}/spreadsheets/d/{id}/export?format=csv{gid_suffix}"
        )),
        _ => Err(FetchError::InvalidSource(format!(
            "{trimmed}: not a spreadsheet link (expected /spreadsheets/d/<id>/...)"
        ))),
    }
}
