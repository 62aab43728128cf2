//! Login, registration, and logout.

use serde_json::json;
use tracing::debug;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{CreatedUser, LoginResponse, NewUser, User};

/// Authentication operations. These target the session-management endpoints,
/// which the client exempts from the refresh-retry flow.
pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token pair and installs the session.
    ///
    /// A `401` here means the credentials were wrong; it surfaces as
    /// [`ApiError::Unauthorized`] without touching any existing session.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let resp: LoginResponse = self
            .client
            .post_json(
                "/token/",
                json!({ "username": username, "password": password }),
            )
            .await?;
        self.client
            .session()
            .establish(resp.access, resp.refresh, resp.user.clone())?;
        debug!(username, "logged in");
        Ok(resp.user)
    }

    /// Creates a new user account.
    ///
    /// A duplicate email is reported as [`ApiError::EmailTaken`] so callers
    /// can tell it apart from other validation failures.
    pub async fn register(&self, new_user: &NewUser) -> Result<CreatedUser, ApiError> {
        let body = serde_json::to_value(new_user)
            .map_err(|err| ApiError::decode(err.to_string()))?;
        // The backend reports a duplicate account as a field error keyed on
        // email (or username, which mirrors it). The field keys are stable
        // even when the message text is localized.
        match self.client.post_json("/register/", body).await {
            Err(ApiError::Validation { fields, .. })
                if fields.iter().any(|f| f == "email" || f == "username") =>
            {
                Err(ApiError::EmailTaken)
            }
            other => other,
        }
    }

    /// Clears the session, in memory and in persistent storage.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.session().clear()?;
        Ok(())
    }
}
