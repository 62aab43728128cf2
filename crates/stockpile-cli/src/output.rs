use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use stockpile_client::{Category, DashboardSummary, Page, Product};

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap());
}

pub fn print_product_page(page: &Page<Product>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            if page.data.is_empty() {
                println!("No products found.");
                return;
            }
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "Price", "Expires", "Category"]);
            for product in &page.data {
                builder.push_record([
                    product.id.to_string(),
                    product.name.clone(),
                    format!("{:.2}", product.price),
                    product.expiration_date.clone().unwrap_or_else(|| "-".to_string()),
                    product
                        .category
                        .as_ref()
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            let table = builder.build().with(Style::rounded()).to_string();
            println!("{table}");
            println!(
                "Page {}/{} ({} items total)",
                page.current_page, page.total_pages, page.total_items
            );
        }
    }
}

pub fn print_product(product: &Product, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(product),
        OutputFormat::Table => {
            println!("{} {}", "Product:".cyan(), product.name.cyan());
            print_json(product);
        }
    }
}

pub fn print_categories(categories: &[Category], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&categories),
        OutputFormat::Table => {
            if categories.is_empty() {
                println!("No categories found.");
                return;
            }
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name"]);
            for category in categories {
                builder.push_record([category.id.to_string(), category.name.clone()]);
            }
            let table = builder.build().with(Style::rounded()).to_string();
            println!("{table}");
        }
    }
}

pub fn print_dashboard(summary: &DashboardSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Table => {
            println!("{}: {}", "Products".cyan(), summary.total_products);
            println!("{}: {}", "Categories".cyan(), summary.total_categories);
            println!("{}: {}", "Expiring soon".cyan(), summary.expiring_soon);
            if !summary.latest_products.is_empty() {
                println!("{}", "Latest products".cyan());
                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Price"]);
                for product in &summary.latest_products {
                    builder.push_record([
                        product.id.to_string(),
                        product.name.clone(),
                        format!("{:.2}", product.price),
                    ]);
                }
                let table = builder.build().with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
    }
}
