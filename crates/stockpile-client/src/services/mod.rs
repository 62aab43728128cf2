//! Typed resource operations over [`crate::ApiClient`].
//!
//! Each service borrows the client and maps one backend resource:
//!
//! - [`AuthService`] - login, registration, logout
//! - [`ProductService`] - product CRUD and paginated listing
//! - [`CategoryService`] - category list/create/delete
//! - [`DashboardService`] - the dashboard summary

mod auth;
mod categories;
mod dashboard;
mod products;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use dashboard::DashboardService;
pub use products::ProductService;

use crate::http::ApiClient;

impl ApiClient {
    /// Authentication operations.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    /// Product operations.
    #[must_use]
    pub fn products(&self) -> ProductService<'_> {
        ProductService::new(self)
    }

    /// Category operations.
    #[must_use]
    pub fn categories(&self) -> CategoryService<'_> {
        CategoryService::new(self)
    }

    /// Dashboard operations.
    #[must_use]
    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(self)
    }
}
