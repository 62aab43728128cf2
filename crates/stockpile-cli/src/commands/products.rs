use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use stockpile_client::{ApiClient, NewProduct};

use crate::cli::{OutputFormat, ProductFieldArgs, ProductGetArgs, ProductListArgs};
use crate::output::{print_product, print_product_page, print_success};

fn to_new_product(args: &ProductFieldArgs) -> NewProduct {
    NewProduct {
        name: args.name.clone(),
        description: args.description.clone(),
        price: args.price,
        expiration_date: args.expiration_date.clone(),
        category_id: args.category,
        image: args.image.as_ref().map(PathBuf::from),
    }
}

pub async fn list(client: &ApiClient, args: &ProductListArgs, format: OutputFormat) -> Result<()> {
    let page = client
        .products()
        .list(args.page, args.limit, args.search.as_deref())
        .await?;
    print_product_page(&page, format);
    Ok(())
}

pub async fn get(client: &ApiClient, args: &ProductGetArgs, format: OutputFormat) -> Result<()> {
    let product = client.products().get(args.id).await?;
    print_product(&product, format);
    Ok(())
}

pub async fn create(
    client: &ApiClient,
    args: &ProductFieldArgs,
    format: OutputFormat,
) -> Result<()> {
    let created = client.products().create(&to_new_product(args)).await?;
    print_success(&format!("Created product {}", created.name.cyan()));
    print_product(&created, format);
    Ok(())
}

pub async fn update(
    client: &ApiClient,
    id: i64,
    args: &ProductFieldArgs,
    format: OutputFormat,
) -> Result<()> {
    let updated = client.products().update(id, &to_new_product(args)).await?;
    print_success(&format!("Updated product {}", updated.name.cyan()));
    print_product(&updated, format);
    Ok(())
}

pub async fn delete(client: &ApiClient, args: &ProductGetArgs) -> Result<()> {
    client.products().delete(args.id).await?;
    print_success(&format!("Deleted product {}", args.id));
    Ok(())
}
