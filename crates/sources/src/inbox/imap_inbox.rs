use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use log::{info, warn};
use mailparse::{MailHeaderMap, ParsedMail};

use super::{extract_download_links, DisclosureInbox};
use crate::errors::SourceError;

const IMAP_PORT: u16 = 993;
const MAILBOX: &str = "INBOX";

/// Only the most recent matches are read.
const MAX_MESSAGES: usize = 10;

/// Subject and decoded body of a disclosure email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxMessage {
    pub subject: String,
    pub body: String,
}

/// IMAP-over-TLS inbox, e.g. Gmail with an app password.
#[derive(Clone)]
pub struct ImapInbox {
    server: String,
    username: String,
    password: String,
    days_back: u32,
}

impl ImapInbox {
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        days_back: u32,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
            days_back,
        }
    }

    async fn search(&self, amc: &str, fund_keyword: &str) -> Result<Vec<InboxMessage>, SourceError> {
        let since = Utc::now().date_naive() - Duration::days(i64::from(self.days_back));
        let query = search_query(amc, since);
        info!("Inbox search: {}", query);

        let inbox = self.clone();
        let raw_messages = tokio::task::spawn_blocking(move || inbox.fetch_raw(&query))
            .await
            .map_err(|e| SourceError::Inbox(format!("search task failed: {e}")))??;

        let keyword = fund_keyword.trim().to_lowercase();
        let mut messages = Vec::new();
        for raw in raw_messages {
            let message = match parse_message(&raw) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Skipping unreadable email: {}", e);
                    continue;
                }
            };
            if keyword.is_empty()
                || message.subject.to_lowercase().contains(&keyword)
                || message.body.to_lowercase().contains(&keyword)
            {
                messages.push(message);
            }
        }
        Ok(messages)
    }

    /// Raw RFC 822 messages matching `query`, newest first.
    fn fetch_raw(&self, query: &str) -> Result<Vec<Vec<u8>>, SourceError> {
        let tls = native_tls::TlsConnector::builder()
            .build()
            .map_err(|e| SourceError::Inbox(format!("TLS setup failed: {e}")))?;
        let client = imap::connect((self.server.as_str(), IMAP_PORT), &self.server, &tls)
            .map_err(|e| SourceError::Inbox(format!("connect to {} failed: {e}", self.server)))?;
        let mut session = client
            .login(&self.username, &self.password)
            .map_err(|(e, _)| SourceError::Inbox(format!("login failed: {e}")))?;

        let result = (|| {
            session.select(MAILBOX)?;
            let mut ids: Vec<u32> = session.search(query)?.into_iter().collect();
            ids.sort_unstable();
            info!("Inbox: {} matching emails", ids.len());

            let mut raw_messages = Vec::new();
            for id in ids.iter().rev().take(MAX_MESSAGES) {
                let fetches = session.fetch(id.to_string(), "RFC822")?;
                raw_messages.extend(fetches.iter().filter_map(|f| f.body().map(<[u8]>::to_vec)));
            }
            Ok::<_, imap::Error>(raw_messages)
        })();

        if let Err(e) = session.logout() {
            warn!("Inbox logout failed: {}", e);
        }
        result.map_err(|e| SourceError::Inbox(e.to_string()))
    }
}

#[async_trait]
impl DisclosureInbox for ImapInbox {
    async fn find_disclosure_link(
        &self,
        amc: &str,
        fund_keyword: &str,
    ) -> Result<Option<String>, SourceError> {
        let messages = self.search(amc, fund_keyword).await?;
        if messages.is_empty() {
            warn!("No portfolio emails found from {}", amc);
            return Ok(None);
        }

        for message in &messages {
            let subject: String = message.subject.chars().take(80).collect();
            info!("Checking email: {}", subject);
            let links = extract_download_links(&message.body, fund_keyword)?;
            if let Some(link) = links.into_iter().next() {
                info!("Inbox link: '{}' -> {}", link.text, link.url);
                return Ok(Some(link.url));
            }
        }
        warn!("No download links found in {} emails", amc);
        Ok(None)
    }
}

/// `(FROM "Tata" SUBJECT "portfolio" SINCE 06-Oct-2025)`
pub fn search_query(amc: &str, since: NaiveDate) -> String {
    format!(
        "(FROM \"{}\" SUBJECT \"portfolio\" SINCE {})",
        amc.replace('"', ""),
        since.format("%d-%b-%Y")
    )
}

/// Subject and body of a raw message. The first HTML part wins over plain
/// text.
pub fn parse_message(raw: &[u8]) -> Result<InboxMessage, SourceError> {
    let mail = mailparse::parse_mail(raw).map_err(|e| SourceError::Inbox(e.to_string()))?;
    let subject = mail.headers.get_first_value("Subject").unwrap_or_default();

    let body = find_part(&mail, "text/html")
        .or_else(|| find_part(&mail, "text/plain"))
        .unwrap_or_default();
    Ok(InboxMessage { subject, body })
}

fn find_part(mail: &ParsedMail<'_>, mimetype: &str) -> Option<String> {
    if mail.subparts.is_empty() {
        return (mail.ctype.mimetype == mimetype)
            .then(|| mail.get_body().ok())
            .flatten();
    }
    mail.subparts.iter().find_map(|part| find_part(part, mimetype))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query() {
        let since = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        assert_eq!(
            search_query("Parag Parikh", since),
            "(FROM \"Parag Parikh\" SUBJECT \"portfolio\" SINCE 06-Oct-2025)"
        );
    }

    #[test]
    fn test_parse_multipart_prefers_html() {
        let raw = concat!(
            "From: Bandhan MF <noreply@bandhanmutual.com>\r\n",
            "Subject: Monthly Portfolio Disclosure - ELSS\r\n",
            "MIME-Version: 1.0\r\n",
            "Content-Type: multipart/alternative; boundary=\"XYZ\"\r\n",
            "\r\n",
            "--XYZ\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "\r\n",
            "Plain body\r\n",
            "--XYZ\r\n",
            "Content-Type: text/html; charset=utf-8\r\n",
            "\r\n",
            "<a href=\"https://delivery.camsonline.com/d/1\">ELSS Fund</a>\r\n",
            "--XYZ--\r\n",
        );

        let message = parse_message(raw.as_bytes()).unwrap();
        assert_eq!(message.subject, "Monthly Portfolio Disclosure - ELSS");
        assert!(message.body.contains("camsonline"));
    }

    #[test]
    fn test_parse_plain_message() {
        let raw = concat!(
            "Subject: Portfolio update\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "\r\n",
            "See https://example.com/portfolio.xlsx\r\n",
        );

        let message = parse_message(raw.as_bytes()).unwrap();
        assert_eq!(message.subject, "Portfolio update");
        assert!(message.body.starts_with("See https://example.com/portfolio.xlsx"));
    }
}
