//! Dashboard summary.

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::DashboardSummary;

/// Dashboard operations.
pub struct DashboardService<'a> {
    client: &'a ApiClient,
}

impl<'a> DashboardService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetches the summary: totals, expiring-soon count, latest products.
    pub async fn summary(&self) -> Result<DashboardSummary, ApiError> {
        self.client.get_json("/dashboard/", Vec::new()).await
    }
}
