//! # stockpile-client
//!
//! Authenticated API client for the Stockpile inventory backend.
//!
//! This crate provides:
//! - Token-based session state with pluggable persistence
//! - An HTTP client that injects bearer credentials and transparently
//!   recovers from an expired access token exactly once per request
//! - Typed services for authentication, products, categories, and the
//!   dashboard summary
//!
//! ## Overview
//!
//! Every outbound request is built once as a [`http::ApiClient`] request,
//! carries the current access token as a `Bearer` header, and runs under a
//! fixed timeout. A `401 Unauthorized` response triggers a single token
//! refresh followed by one re-issue of the original request; a second `401`,
//! or a refresh failure, surfaces to the caller. Refresh failure also clears
//! the session, logging the user out.
//!
//! ## Modules
//!
//! - [`session`] - Session state, persistence trait, file/memory stores
//! - [`http`] - The authenticated HTTP client and retry flow
//! - [`models`] - Typed request/response payloads
//! - [`services`] - Resource operations (auth, products, categories, dashboard)
//! - [`error`] - The client error taxonomy

pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod session;

pub use error::ApiError;
pub use http::{ApiClient, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
pub use models::{
    Category, CreatedUser, DashboardSummary, LoginResponse, NewProduct, NewUser, Page, Product,
    User,
};
pub use session::{FileStorage, MemoryStorage, Session, SessionHandle, SessionStorage, StorageError};
