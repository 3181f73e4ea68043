//! Gateway types module
//!
//! - [`response`]: `ApiResponse<T>` envelope, error codes and `ApiError`
//! - [`extract`]: `ApiJson<T>`/`ApiPath<T>` extractors with enveloped rejections
//! - [`ledger`]: request/response DTOs for accounts and transfers

pub mod extract;
pub mod ledger;
pub mod response;

pub use extract::{ApiJson, ApiPath};
pub use ledger::{AccountData, TransactionData, TransferRequest};
pub use response::{ApiError, ApiResponse, ApiResult, created, error_codes, ok};
