use std::collections::HashSet;

use scraper::Html;

use crate::errors::SourceError;
use crate::index::selector;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];
const HREF_KEYWORDS: &[&str] = &["portfolio", "disclosure", "download"];
const TEXT_KEYWORDS: &[&str] = &["portfolio", "disclosure", "elss", "fund", "scheme"];

/// A candidate download link found in an email body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailLink {
    pub text: String,
    pub url: String,
}

fn is_portfolio_link(href: &str, text: &str) -> bool {
    let href = href.to_lowercase();
    let text = text.to_lowercase();

    let looks_relevant = href.contains(".xls")
        || (href.contains("camsonline.com") && href.contains("delivery"))
        || HREF_KEYWORDS.iter().any(|k| href.contains(k))
        || TEXT_KEYWORDS.iter().any(|k| text.contains(k));

    looks_relevant && !IMAGE_EXTENSIONS.iter().any(|ext| href.contains(ext))
}

/// Portfolio download links in an email body, de-duplicated by URL. Links
/// whose text mentions `fund_keyword` come first; order is otherwise kept.
pub fn extract_download_links(body: &str, fund_keyword: &str) -> Result<Vec<MailLink>, SourceError> {
    let document = Html::parse_document(body);
    let anchors = selector("a[href]")?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if !href.starts_with("http") {
            continue;
        }
        let text = anchor.text().collect::<String>().trim().to_string();
        if is_portfolio_link(href, &text) && seen.insert(href.to_string()) {
            links.push(MailLink {
                text,
                url: href.to_string(),
            });
        }
    }

    let keyword = fund_keyword.trim().to_lowercase();
    if !keyword.is_empty() {
        // stable: matching links keep their relative order
        links.sort_by_key(|link| !link.text.to_lowercase().contains(&keyword));
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<html><body>
        <p>Dear Investor, please find the monthly portfolio disclosure.</p>
        <a href="https://www.bandhanmutual.com/logo.png">Bandhan Mutual Fund</a>
        <a href="mailto:service@bandhanmutual.com">Contact</a>
        <a href="https://delivery.camsonline.com/d/abc123">Bandhan Large Cap Fund</a>
        <a href="https://delivery.camsonline.com/d/def456">Bandhan ELSS Tax saver Fund</a>
        <a href="https://delivery.camsonline.com/d/abc123">Bandhan Large Cap Fund (again)</a>
        <a href="https://www.bandhanmutual.com/unsubscribe">Unsubscribe</a>
        <a href="/relative/portfolio.xlsx">Relative</a>
    </body></html>"#;

    #[test]
    fn test_extracts_portfolio_links_and_prioritises_keyword() {
        let links = extract_download_links(BODY, "ELSS").unwrap();
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://delivery.camsonline.com/d/def456",
                "https://delivery.camsonline.com/d/abc123",
            ]
        );
        assert_eq!(links[0].text, "Bandhan ELSS Tax saver Fund");
    }

    #[test]
    fn test_without_keyword_order_is_kept() {
        let links = extract_download_links(BODY, "").unwrap();
        assert_eq!(links[0].url, "https://delivery.camsonline.com/d/abc123");
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_direct_spreadsheet_link() {
        let body = r#"<a href="https://amc.ppfas.com/files/PPFCF_Nov_2025.xls">here</a>"#;
        let links = extract_download_links(body, "Parag").unwrap();
        assert_eq!(links.len(), 1);
        assert!(links[0].url.ends_with(".xls"));
    }

    #[test]
    fn test_plain_text_body_has_no_links() {
        let links = extract_download_links("Portfolio attached as PDF.", "ELSS").unwrap();
        assert!(links.is_empty());
    }
}
