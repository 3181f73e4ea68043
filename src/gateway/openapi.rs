//! OpenAPI Documentation
//!
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{AccountData, TransactionData, TransferRequest};
use crate::user_auth::handlers::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// HS256 bearer token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledger Transfer API",
        version = "1.0.0",
        description = "Multi-account ledger with atomic, audited fund transfers."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::gateway::handlers::account::list_accounts,
        crate::gateway::handlers::account::open_account,
        crate::gateway::handlers::account::account_history,
        crate::gateway::handlers::transfer::create_transfer,
    ),
    components(
        schemas(
            HealthResponse,
            AccountData,
            TransactionData,
            TransferRequest,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Account", description = "Account queries (auth required)"),
        (name = "Transfer", description = "Fund transfers (auth required)"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_generates() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Ledger Transfer API");
        assert!(doc.to_json().is_ok());
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths.paths;
        for path in [
            "/health",
            "/register",
            "/login",
            "/accounts",
            "/accounts/{id}/transactions",
            "/transfer",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_security_scheme_registered() {
        let components = ApiDoc::openapi()
            .components
            .expect("should have components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
