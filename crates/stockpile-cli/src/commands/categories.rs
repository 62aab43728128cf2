use anyhow::Result;
use colored::Colorize;

use stockpile_client::{ApiClient, ApiError};

use crate::cli::{CategoryAddArgs, CategoryRemoveArgs, OutputFormat};
use crate::output::{print_categories, print_success};

pub async fn list(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let categories = client.categories().list().await?;
    print_categories(&categories, format);
    Ok(())
}

pub async fn add(client: &ApiClient, args: &CategoryAddArgs) -> Result<()> {
    match client.categories().create(&args.name).await {
        Ok(category) => {
            print_success(&format!(
                "Created category {} (id {})",
                category.name.cyan(),
                category.id
            ));
            Ok(())
        }
        Err(ApiError::Validation { status: 409, .. }) => {
            anyhow::bail!("Category \"{}\" already exists", args.name)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn remove(client: &ApiClient, args: &CategoryRemoveArgs) -> Result<()> {
    client.categories().delete(args.id).await?;
    print_success(&format!("Deleted category {}", args.id));
    Ok(())
}
