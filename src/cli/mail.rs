use anyhow::Result;

use super::print_json;
use crate::core::AppConfig;
use crate::graph::GraphClient;
use crate::graph::mail::{DEFAULT_SEND_PAUSE, ItemBody};

pub async fn run(
    config: &AppConfig,
    subject: &str,
    body: &str,
    is_html: bool,
    recipients: &[String],
) -> Result<()> {
    let client = GraphClient::from_config(config)?;
    let report = client
        .send_bulk_bcc(subject, &ItemBody::new(body, is_html), recipients, DEFAULT_SEND_PAUSE)
        .await?;
    if report.failed > 0 {
        tracing::warn!("{} of {} messages failed", report.failed, report.sent + report.failed);
    }
    print_json(&report)
}
