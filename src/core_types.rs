//! Core identifier types shared by every module.
//!
//! All identifiers are database-assigned `BIGSERIAL` values. They are plain
//! aliases so they bind directly to `sqlx` queries without conversions.

/// User ID - assigned at registration, never reused.
pub type UserId = i64;

/// Account ID - assigned when the account is opened.
///
/// # Lock ordering
/// Transfers lock account rows in ascending `AccountId` order, so the
/// ordering of this type is part of the deadlock-freedom contract.
pub type AccountId = i64;

/// Ledger entry ID - one per successful transfer
pub type TransactionId = i64;
