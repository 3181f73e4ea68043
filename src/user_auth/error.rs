use thiserror::Error;

use crate::ledger::LedgerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Credential hashing or signing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidInput(_) => "INVALID_INPUT",
            AuthError::UsernameTaken(_) => "USERNAME_TAKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::Hashing(_) => "HASHING_ERROR",
            AuthError::Ledger(e) => e.code(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::InvalidInput(_) | AuthError::UsernameTaken(_) => 400,
            AuthError::InvalidCredentials | AuthError::InvalidToken => 401,
            AuthError::Hashing(_) => 500,
            AuthError::Ledger(e) => e.http_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::InvalidInput("x".into()).http_status(), 400);
        assert_eq!(AuthError::InvalidCredentials.http_status(), 401);
        assert_eq!(AuthError::InvalidToken.http_status(), 401);
        assert_eq!(
            AuthError::from(LedgerError::Storage("down".into())).http_status(),
            500
        );
    }

    #[test]
    fn test_ledger_error_code_passes_through() {
        let err = AuthError::from(LedgerError::Storage("down".into()));
        assert_eq!(err.code(), "STORAGE_ERROR");
    }
}
