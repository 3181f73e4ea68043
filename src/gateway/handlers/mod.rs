//! HTTP handlers
//!
//! Each handler receives the caller identity as an `Extension` inserted by
//! the JWT middleware and delegates to the transfer engine.

pub mod account;
pub mod health;
pub mod transfer;

pub use account::{account_history, list_accounts, open_account};
pub use health::{HealthResponse, health_check};
pub use transfer::create_transfer;
