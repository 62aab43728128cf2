use std::fmt;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "stockpile")]
#[command(about = "Stockpile CLI — manage products, categories, and users")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and STOCKPILE_URL env var)
    #[arg(short, long, global = true, env = "STOCKPILE_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "STOCKPILE_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Login and store the session tokens
    Login(LoginArgs),
    /// Logout (clear the stored session)
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Register a new user account
    Register(RegisterArgs),
    /// Show the dashboard summary
    Dashboard,
    /// Manage products
    Product(ProductArgs),
    /// Manage categories
    Category(CategoryArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Username (the account email)
    #[arg(short, long)]
    pub username: String,
    /// Password
    #[arg(long)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct RegisterArgs {
    /// First name
    #[arg(long)]
    pub first_name: String,
    /// Last name
    #[arg(long)]
    pub last_name: String,
    /// Email address (also used as the username)
    #[arg(long)]
    pub email: String,
    /// Password
    #[arg(long)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommands,
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products (paginated)
    List(ProductListArgs),
    /// Show one product
    Get(ProductGetArgs),
    /// Create a product
    Create(ProductFieldArgs),
    /// Update a product
    Update(ProductUpdateArgs),
    /// Delete a product
    Delete(ProductGetArgs),
}

#[derive(clap::Args)]
pub struct ProductListArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Results per page
    #[arg(long, default_value_t = 12)]
    pub limit: u32,
    /// Filter by name, description, or category name
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(clap::Args)]
pub struct ProductGetArgs {
    /// Product id
    pub id: i64,
}

#[derive(clap::Args)]
pub struct ProductFieldArgs {
    /// Product name
    #[arg(long)]
    pub name: String,
    /// Description
    #[arg(long)]
    pub description: Option<String>,
    /// Price
    #[arg(long)]
    pub price: f64,
    /// Expiration date (YYYY-MM-DD)
    #[arg(long)]
    pub expiration_date: Option<String>,
    /// Category id
    #[arg(long)]
    pub category: Option<i64>,
    /// Path to an image file
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(clap::Args)]
pub struct ProductUpdateArgs {
    /// Product id
    pub id: i64,
    #[command(flatten)]
    pub fields: ProductFieldArgs,
}

#[derive(clap::Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommands,
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,
    /// Create a category
    Add(CategoryAddArgs),
    /// Delete a category
    Remove(CategoryRemoveArgs),
}

#[derive(clap::Args)]
pub struct CategoryAddArgs {
    /// Category name (unique)
    pub name: String,
}

#[derive(clap::Args)]
pub struct CategoryRemoveArgs {
    /// Category id
    pub id: i64,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format)
    pub key: String,
    /// Value
    pub value: String,
}
