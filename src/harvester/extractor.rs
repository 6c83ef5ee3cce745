use crate::domain::{Message, TextSpan};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Characters trimmed from the end of a candidate, e.g. `https://a.com).` -> `https://a.com`.
const TRAILING_PUNCTUATION: [char; 11] = [')', '{', '}', ']', '>', ',', '.', ';', ':', '*', '\''];

/// Invite links are never collected.
const BLACKLIST: [&str; 2] = ["t.me/+", "t.me/joinchat"];

/// Returns the links of a message in first-seen order, without duplicates.
///
/// Candidates are taken from entities with an attached url, then from url
/// entities pointing into the text, then from a plain scan of the text.
/// Malformed entities are skipped.
pub fn extract(message: &Message) -> Vec<String> {
    let explicit = message
        .entities
        .iter()
        .filter_map(|span| span.explicit_url.clone());

    let sliced = message
        .entities
        .iter()
        .filter(|span| span.explicit_url.is_none())
        .filter_map(|span| slice_span(&message.text, span))
        .filter(|candidate| candidate.starts_with("http"));

    let scanned = scan_text(&message.text);

    let mut links: Vec<String> = Vec::new();

    for candidate in explicit.chain(sliced).chain(scanned) {
        let Some(link) = clean(&candidate) else {
            continue;
        };

        if !links.contains(&link) {
            links.push(link);
        }
    }

    links
}

fn scan_text(text: &str) -> Vec<String> {
    static URL_REGEX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("regex should be valid"));

    URL_REGEX
        .find_iter(text)
        .map(|found| found.as_str().to_owned())
        .collect()
}

/// Cuts the span out of `text`. Offsets count UTF-16 code units.
fn slice_span(text: &str, span: &TextSpan) -> Option<String> {
    let offset = span.offset?;
    let length = span.length.filter(|length| *length > 0)?;
    let end = offset.checked_add(length)?;

    let units: Vec<u16> = text.encode_utf16().collect();
    let slice = units.get(offset..end)?;

    String::from_utf16(slice).ok()
}

/// Trims trailing punctuation and checks the result is an http(s) url with a
/// host that is not blacklisted.
fn clean(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim_end_matches(&TRAILING_PUNCTUATION[..]).to_owned();

    if !has_authority(&trimmed) {
        return None;
    }

    let url = Url::parse(&trimmed).ok()?;

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    if url.host_str().map_or(true, str::is_empty) {
        return None;
    }

    if BLACKLIST.iter().any(|blocked| trimmed.contains(blocked)) {
        return None;
    }

    Some(trimmed)
}

/// Requires a non-empty `//authority` right after the scheme. The url parser
/// would otherwise accept `https:host` or `https:///host` as having a host.
fn has_authority(candidate: &str) -> bool {
    let Some((_, rest)) = candidate.split_once(':') else {
        return false;
    };

    rest.strip_prefix("//")
        .and_then(|rest| rest.split(&['/', '?', '#'][..]).next())
        .is_some_and(|authority| !authority.is_empty())
}
