use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error::AuthError;
use crate::core_types::UserId;
use crate::ledger::{LedgerError, LedgerRepository};
use crate::models::{AuthenticatedUser, NewUser, Role, User};

const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 3600;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id as string
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    #[schema(example = "password123")]
    pub password: String,
}

pub struct AuthService {
    repo: Arc<dyn LedgerRepository>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(repo: Arc<dyn LedgerRepository>, jwt_secret: String, token_ttl_secs: u64) -> Self {
        Self {
            repo,
            jwt_secret,
            token_ttl: Duration::seconds(token_ttl_secs.min(MAX_TOKEN_TTL_SECS) as i64),
        }
    }

    /// Register a new user with the default role
    pub async fn register(&self, req: RegisterRequest) -> Result<UserId, AuthError> {
        req.validate()
            .map_err(|e| AuthError::InvalidInput(e.to_string()))?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string();

        let user = self
            .repo
            .record_user(NewUser {
                username: req.username.clone(),
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                LedgerError::UsernameTaken(_) => AuthError::UsernameTaken(req.username.clone()),
                other => AuthError::Ledger(other),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user.id)
    }

    /// Verify credentials and issue a bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed_hash =
            PasswordHash::new(&user.password_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| AuthError::Hashing("token ttl out of range".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Decode and validate a bearer token into the caller's identity
    pub fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?
            .claims;

        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidToken)?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedgerRepository;

    fn signup(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn service(secret: &str) -> AuthService {
        AuthService::new(
            Arc::new(InMemoryLedgerRepository::new()),
            secret.to_string(),
            3600,
        )
    }

    #[tokio::test]
    async fn test_register_then_login_issues_verifiable_token() {
        let auth = service("secret");
        let user_id = auth.register(signup("alice", "password1")).await.unwrap();

        let token = auth.login("alice", "password1").await.unwrap();
        let identity = auth.verify_token(&token).unwrap();

        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::User);
    }

    #[test]
    fn test_register_request_length_rules() {
        assert!(signup("alice", "secret1").validate().is_ok());
        assert!(signup("al", "secret1").validate().is_err());
        assert!(signup("alice", "12345").validate().is_err());
        // counted in characters, not bytes
        assert!(signup("äö", "secret1").validate().is_err());
        assert!(signup("äöü", "secret1").validate().is_ok());
    }

    #[tokio::test]
    async fn test_register_rejects_short_input() {
        let auth = service("secret");
        let short_name = auth.register(signup("al", "password1")).await;
        let short_pass = auth.register(signup("alice", "12345")).await;

        assert!(
            matches!(&short_name, Err(AuthError::InvalidInput(msg)) if msg.contains("username"))
        );
        assert!(
            matches!(&short_pass, Err(AuthError::InvalidInput(msg)) if msg.contains("password"))
        );
        assert!(auth.login("alice", "12345").await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let auth = service("secret");
        auth.register(signup("alice", "password1")).await.unwrap();

        assert_eq!(
            auth.register(signup("alice", "password2")).await,
            Err(AuthError::UsernameTaken("alice".to_string()))
        );
    }

    #[tokio::test]
    async fn test_login_wrong_password_or_unknown_user() {
        let auth = service("secret");
        auth.register(signup("alice", "password1")).await.unwrap();

        assert_eq!(
            auth.login("alice", "wrong-pass").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.login("nobody", "password1").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let issuer = service("secret-a");
        issuer.register(signup("alice", "password1")).await.unwrap();
        let token = issuer.login("alice", "password1").await.unwrap();

        assert_eq!(
            service("secret-b").verify_token(&token),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = service("secret");
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "1".to_string(),
            role: "user".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(auth.verify_token(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert_eq!(
            service("secret").verify_token("not-a-jwt"),
            Err(AuthError::InvalidToken)
        );
    }
}
