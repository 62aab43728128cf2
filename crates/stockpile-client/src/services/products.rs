//! Product CRUD and paginated listing.

use crate::error::ApiError;
use crate::http::{ApiClient, FormField};
use crate::models::{NewProduct, Page, Product};
use crate::session::StorageError;

/// Product operations.
pub struct ProductService<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists products, newest first. `search` matches name, description, and
    /// category name.
    pub async fn list(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<Page<Product>, ApiError> {
        let mut query = vec![
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        if let Some(search) = search {
            query.push(("search".to_string(), search.to_string()));
        }
        self.client.get_json("/products/", query).await
    }

    /// Fetches a single product.
    pub async fn get(&self, id: i64) -> Result<Product, ApiError> {
        self.client
            .get_json(&format!("/products/{id}/"), Vec::new())
            .await
    }

    /// Creates a product. Sent as a multipart form so the image file, when
    /// present, rides along.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let fields = form_fields(product).await?;
        self.client.post_form("/products/", fields).await
    }

    /// Replaces a product.
    pub async fn update(&self, id: i64, product: &NewProduct) -> Result<Product, ApiError> {
        let fields = form_fields(product).await?;
        self.client
            .put_form(&format!("/products/{id}/"), fields)
            .await
    }

    /// Deletes a product.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/products/{id}/")).await
    }
}

async fn form_fields(product: &NewProduct) -> Result<Vec<FormField>, ApiError> {
    let mut fields = vec![
        FormField::Text {
            name: "name".to_string(),
            value: product.name.clone(),
        },
        FormField::Text {
            name: "price".to_string(),
            value: product.price.to_string(),
        },
    ];
    if let Some(description) = &product.description {
        fields.push(FormField::Text {
            name: "description".to_string(),
            value: description.clone(),
        });
    }
    if let Some(date) = &product.expiration_date {
        fields.push(FormField::Text {
            name: "expiration_date".to_string(),
            value: date.clone(),
        });
    }
    if let Some(category_id) = product.category_id {
        fields.push(FormField::Text {
            name: "category_id".to_string(),
            value: category_id.to_string(),
        });
    }
    if let Some(path) = &product.image {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ApiError::Storage(StorageError::from(err)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        fields.push(FormField::File {
            name: "image".to_string(),
            file_name,
            bytes,
        });
    }
    Ok(fields)
}
