//! Disclosure page link selection.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::profile::{DisclosureRequest, LinkRule};
use crate::errors::SourceError;
use crate::index::selector;

/// An anchor on a disclosure page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub text: String,
    pub href: String,
}

/// Year and month a link text refers to, e.g. `30 November 2025` → (2025, 11).
pub type Period = (i32, u32);

pub fn extract_page_links(html: &str) -> Result<Vec<PageLink>, SourceError> {
    let document = Html::parse_document(html);
    let anchors = selector("a[href]")?;
    Ok(document
        .select(&anchors)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim().to_string();
            let text = anchor
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            Some(PageLink { text, href })
        })
        .collect())
}

/// Year and month mentioned in `text`. A year without a month ranks as
/// month 0 so any dated link of the same year beats it.
pub fn period_in(text: &str) -> Option<Period> {
    static YEAR: OnceLock<Option<Regex>> = OnceLock::new();
    static MONTH: OnceLock<Option<Regex>> = OnceLock::new();

    let lower = text.to_lowercase();
    let year = YEAR
        .get_or_init(|| Regex::new(r"\b(20\d{2})\b").ok())
        .as_ref()?
        .captures_iter(&lower)
        .filter_map(|c| c.get(1)?.as_str().parse::<i32>().ok())
        .max()?;

    let month = MONTH
        .get_or_init(|| {
            Regex::new(
                r"\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)(?:uary|ruary|ch|il|e|y|ust|t|tember|ober|ember)?\b",
            )
            .ok()
        })
        .as_ref()
        .and_then(|re| re.captures(&lower))
        .and_then(|c| month_number(c.get(1)?.as_str()))
        .unwrap_or(0);

    Some((year, month))
}

fn month_number(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|i| i as u32 + 1)
}

fn matches_rule(link: &PageLink, request: &DisclosureRequest) -> bool {
    let href = link.href.to_lowercase();
    let text = link.text.to_lowercase();

    match request.profile.link_rule {
        LinkRule::Scheme { extension } => {
            if !href.contains(extension) {
                return false;
            }
            let scheme = request.scheme_name.to_lowercase();
            let names_scheme = !scheme.is_empty() && text.contains(&scheme);
            let names_code = request
                .link_code
                .as_deref()
                .map(|code| code.to_lowercase())
                .is_some_and(|code| text.contains(&code) || href.contains(&code));
            names_scheme || names_code
        }
        LinkRule::Dated { extension } => href.contains(extension) && period_in(&link.text).is_some(),
    }
}

/// The matching link with the most recent period. Ties go to the link that
/// appears first on the page.
pub fn select_disclosure_link<'a>(
    links: &'a [PageLink],
    request: &DisclosureRequest,
) -> Option<&'a PageLink> {
    let selected = links
        .iter()
        .filter(|link| matches_rule(link, request))
        .rev()
        .max_by_key(|link| period_in(&link.text));
    if let Some(link) = selected {
        debug!("{}: selected '{}' -> {}", request.profile.id, link.text, link.href);
    }
    selected
}

/// Absolute URL of `href` as found on `page_url`.
pub fn resolve_link(page_url: &str, href: &str) -> Result<String, SourceError> {
    let base = Url::parse(page_url)
        .map_err(|e| SourceError::parse("URL", format!("{page_url}: {e}")))?;
    base.join(href)
        .map(String::from)
        .map_err(|e| SourceError::parse("URL", format!("{href}: {e}")))
}
