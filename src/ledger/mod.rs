//! Ledger core
//!
//! Accounts, the append-only transaction log and the atomic transfer
//! primitive that moves value between them.
//!
//! - [`repository`] - storage capability trait
//! - [`postgres`] / [`memory`] - its two implementations
//! - [`engine`] - authorization and validation in front of the primitive
//! - [`guard`] - source ownership check

pub mod engine;
pub mod error;
pub mod guard;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use engine::{TransferCommand, TransferEngine};
pub use error::LedgerError;
pub use memory::InMemoryLedgerRepository;
pub use postgres::PgLedgerRepository;
pub use repository::LedgerRepository;
