//! Category list/create/delete.

use serde_json::json;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::Category;

/// Category operations.
pub struct CategoryService<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoryService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists all categories.
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get_json("/categories/", Vec::new()).await
    }

    /// Creates a category. A duplicate name surfaces as
    /// [`ApiError::Validation`] with HTTP 409.
    pub async fn create(&self, name: &str) -> Result<Category, ApiError> {
        self.client
            .post_json("/categories/", json!({ "name": name }))
            .await
    }

    /// Deletes a category. Products referencing it keep existing with the
    /// reference nulled out.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/categories/{id}/")).await
    }
}
