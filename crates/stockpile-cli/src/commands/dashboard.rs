use anyhow::Result;

use stockpile_client::ApiClient;

use crate::cli::OutputFormat;
use crate::output::print_dashboard;

pub async fn summary(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let summary = client.dashboard().summary().await?;
    print_dashboard(&summary, format);
    Ok(())
}
