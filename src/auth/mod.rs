//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Anonymous, login token and service account (JWT) modes
//! - Bearer token expiry tracking and renewal
//! - Visibility/projection defaults that follow the credential state

pub mod authorizer;
pub mod models;
pub mod session;


pub use authorizer::{ServiceAccountAuthorizer, TokenAuthorizer, GOOGLE_AUTH_SCOPE};
pub use models::{AuthMode, BearerToken, Credential, Projection, ServiceAccountCredential, Visibility};
pub use session::AuthSession;
