use std::sync::Arc;

use holdwatch_core::config::FundSource;
use holdwatch_core::snapshot::Holdings;
use log::{info, warn};
use reqwest::Client;
use rust_decimal::Decimal;

use super::links::{extract_page_links, resolve_link, select_disclosure_link};
use super::profile::DisclosureRequest;
use super::sheet::parse_workbook;
use crate::errors::SourceError;
use crate::http::{get_bytes, get_text, ACCEPT_HTML};
use crate::inbox::DisclosureInbox;

/// Fetches a fund's holdings from its AMC's monthly portfolio disclosure.
///
/// The inbox is tried first when configured and the AMC mails its
/// disclosures; the public disclosure page is the fallback.
#[derive(Clone)]
pub struct DisclosureFetcher {
    client: Client,
    inbox: Option<Arc<dyn DisclosureInbox>>,
    min_holding: Decimal,
}

impl DisclosureFetcher {
    pub fn new(client: Client, inbox: Option<Arc<dyn DisclosureInbox>>, min_holding: Decimal) -> Self {
        Self {
            client,
            inbox,
            min_holding,
        }
    }

    pub async fn fetch(&self, source: &FundSource) -> Result<Holdings, SourceError> {
        let request = DisclosureRequest::from_source(source);
        let id = request.profile.id;

        if let Some(holdings) = self.fetch_from_inbox(&request).await {
            return Ok(holdings);
        }

        info!("{}: looking up {} on {}", id, request.scheme_name, request.profile.page_url);
        let url = self.find_page_link(&request).await?;
        self.download_and_parse(&url, &request).await
    }

    /// Holdings from the newest disclosure email, or `None` when the inbox
    /// has nothing usable. Inbox failures never fail the fetch.
    async fn fetch_from_inbox(&self, request: &DisclosureRequest) -> Option<Holdings> {
        let inbox = self.inbox.as_ref()?;
        let (amc, keyword) = request.inbox_query()?;
        let id = request.profile.id;

        info!("{}: searching inbox for {} disclosure emails", id, amc);
        let url = match inbox.find_disclosure_link(amc, &keyword).await {
            Ok(Some(url)) => url,
            Ok(None) => return None,
            Err(e) => {
                warn!("{}: inbox search failed: {}", id, e);
                return None;
            }
        };

        match self.download_and_parse(&url, request).await {
            Ok(holdings) if !holdings.is_empty() => {
                info!("{}: {} holdings from inbox link", id, holdings.len());
                Some(holdings)
            }
            Ok(_) => {
                warn!("{}: inbox workbook had no holdings", id);
                None
            }
            Err(e) => {
                warn!("{}: inbox workbook failed: {}", id, e);
                None
            }
        }
    }

    async fn find_page_link(&self, request: &DisclosureRequest) -> Result<String, SourceError> {
        let page_url = request.profile.page_url;
        let html = get_text(&self.client, page_url, ACCEPT_HTML, request.profile.id).await?;
        let links = extract_page_links(&html)?;

        let link = select_disclosure_link(&links, request).ok_or_else(|| {
            SourceError::not_found(
                request.profile.id,
                format!("no disclosure link for '{}' on {}", request.scheme_name, page_url),
            )
        })?;
        info!("{}: found '{}'", request.profile.id, link.text);
        resolve_link(page_url, &link.href)
    }

    async fn download_and_parse(
        &self,
        url: &str,
        request: &DisclosureRequest,
    ) -> Result<Holdings, SourceError> {
        let bytes = get_bytes(&self.client, url, request.profile.id).await?;
        let holdings = parse_workbook(bytes, request, self.min_holding)?;
        info!(
            "{}: parsed {} holdings for {}",
            request.profile.id,
            holdings.len(),
            request.scheme_name
        );
        Ok(holdings)
    }
}
