//! User authentication
//!
//! Password hashing (argon2), HS256 token issuance and verification
//! (jsonwebtoken), and the middleware that turns a bearer token into an
//! [`AuthenticatedUser`](crate::models::AuthenticatedUser) request extension.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod service;

pub use error::AuthError;
pub use service::{AuthService, Claims};
