//! Inbox search for AMC portfolio disclosure emails.
//!
//! Several AMCs mail investors a monthly link to their disclosure workbook.
//! When inbox credentials are configured those links are tried before the
//! public disclosure pages.

mod imap_inbox;
mod mail_links;

pub use imap_inbox::*;
pub use mail_links::*;

use async_trait::async_trait;

use crate::errors::SourceError;

/// A mailbox that can be searched for disclosure download links.
#[async_trait]
pub trait DisclosureInbox: Send + Sync {
    /// First download link from the most recent matching email, if any.
    async fn find_disclosure_link(
        &self,
        amc: &str,
        fund_keyword: &str,
    ) -> Result<Option<String>, SourceError>;
}
