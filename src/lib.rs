//! Ledger Transfer Engine
//!
//! Registered users hold monetary accounts and move funds between them.
//! Transfers are atomic, never overdraw an account and leave exactly one
//! audit record each.
//!
//! # Modules
//!
//! - [`core_types`] - Identifier aliases (UserId, AccountId, TransactionId)
//! - [`models`] - User, Account and Transaction records
//! - [`money`] - Strict decimal parsing and positive amounts
//! - [`ledger`] - Repository trait, storage backends and the transfer engine
//! - [`user_auth`] - Password hashing, JWT issuance and verification
//! - [`gateway`] - axum HTTP surface
//! - [`db`] - PostgreSQL pool and schema
//! - [`config`] / [`logging`] - Process bootstrap

// Core types - must be first!
pub mod core_types;

pub mod models;
pub mod money;

pub mod ledger;

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod user_auth;

// Convenient re-exports at crate root
pub use core_types::{AccountId, TransactionId, UserId};
pub use ledger::{
    InMemoryLedgerRepository, LedgerError, LedgerRepository, PgLedgerRepository, TransferCommand,
    TransferEngine,
};
pub use models::{Account, AuthenticatedUser, Role, Transaction, User};
pub use money::PositiveAmount;
