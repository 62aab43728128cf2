//! Typed payloads exchanged with the Stockpile backend.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The authenticated user record returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A product as returned by the backend.
///
/// `category` is optional: deleting a category leaves its products in place
/// with the reference nulled out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Fields for creating or updating a product. Sent as a multipart form so an
/// image file can ride along.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub expiration_date: Option<String>,
    pub category_id: Option<i64>,
    pub image: Option<PathBuf>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub data: Vec<T>,
}

/// The dashboard summary payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: u64,
    pub total_categories: u64,
    /// Products whose expiration date falls within the next 30 days.
    pub expiring_soon: u64,
    #[serde(default)]
    pub latest_products: Vec<Product>,
}

/// Successful response from the token-issue endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Successful response from the token-refresh endpoint. The rotated refresh
/// token is omitted by backends that do not rotate.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Fields for registering a new user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Confirmation returned by the registration endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}
