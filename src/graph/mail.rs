//! Sending mail as the signed in user

use std::time::Duration;

use itertools::Itertools;
use reqwest::StatusCode;
use serde::Serialize;

use super::models::{EmailAddress, Recipient};
use super::{GraphClient, GraphError};

/// Recipients per message, below the Exchange per-message limit
pub const BCC_CHUNK_SIZE: usize = 90;
pub const DEFAULT_SEND_PAUSE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub content_type: String,
    pub content: String,
}

impl ItemBody {
    pub fn new(content: &str, is_html: bool) -> Self {
        Self {
            content_type: if is_html { "HTML" } else { "Text" }.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub subject: String,
    pub body: ItemBody,
    pub to_recipients: Vec<Recipient>,
    pub bcc_recipients: Vec<Recipient>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest<'a> {
    message: &'a OutgoingMessage,
    save_to_sent_items: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BulkSendReport {
    pub sent: usize,
    pub failed: usize,
    pub last_error: Option<String>,
}

pub fn recipients(addresses: &[String]) -> Vec<Recipient> {
    addresses
        .iter()
        .map(|address| Recipient {
            email_address: EmailAddress {
                address: address.clone(),
                name: None,
            },
        })
        .collect()
}

/// Trim, lowercase and drop blank or repeated addresses, keeping order
pub fn dedupe_addresses(addresses: &[String]) -> Vec<String> {
    addresses
        .iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .unique()
        .collect()
}

impl GraphClient {
    pub async fn send_mail(&self, message: &OutgoingMessage) -> Result<(), GraphError> {
        let status = self
            .post_empty(
                "/me/sendMail",
                &SendMailRequest {
                    message,
                    save_to_sent_items: true,
                },
            )
            .await?;
        if status != StatusCode::ACCEPTED {
            tracing::debug!("sendMail answered {} instead of 202", status);
        }
        Ok(())
    }

    /// Send one message per chunk of BCC recipients. A failed chunk is
    /// counted and the run continues, except for authorization
    /// failures which stop it.
    pub async fn send_bulk_bcc(
        &self,
        subject: &str,
        body: &ItemBody,
        addresses: &[String],
        pause: Duration,
    ) -> Result<BulkSendReport, GraphError> {
        let addresses = dedupe_addresses(addresses);
        if addresses.is_empty() {
            return Err(GraphError::InvalidInput(String::from("no recipients")));
        }

        let mut report = BulkSendReport::default();
        let chunks: Vec<&[String]> = addresses.chunks(BCC_CHUNK_SIZE).collect();
        let total = chunks.len();

        for (i, chunk) in chunks.into_iter().enumerate() {
            let message = OutgoingMessage {
                subject: subject.to_string(),
                body: body.clone(),
                to_recipients: vec![],
                bcc_recipients: recipients(chunk),
            };
            match self.send_mail(&message).await {
                Ok(()) => report.sent += 1,
                Err(e @ GraphError::Unauthorized { .. }) => return Err(e),
                Err(e) => {
                    tracing::warn!("Bulk send chunk {}/{} failed: {}", i + 1, total, e);
                    report.failed += 1;
                    report.last_error = Some(e.to_string());
                }
            }
            if i + 1 < total && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        Ok(report)
    }
}
