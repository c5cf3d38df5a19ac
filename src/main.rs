use anyhow::Result;
use graphdesk::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
