//! Authentication Middleware
//!
//! Cookie-borne token validation for protected routes. Tokens are minted
//! by the wider platform and arrive in a named cookie; this service checks
//! the signature against the shared secret and extracts the username from
//! the `sub` claim. The same verification guards the WebSocket handshake.

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Token claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Pull the named cookie's value out of a raw `Cookie` header.
pub fn token_from_cookie_header<'a>(header: &'a str, cookie_name: &str) -> Option<&'a str> {
    header.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(cookie_name)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

/// Verify a signed token and return the username it identifies.
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<String, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".into())
        }
        _ => AppError::Unauthorized("Invalid token".into()),
    })?;

    if token_data.claims.sub.is_empty() {
        return Err(AppError::Unauthorized("Invalid token claims".into()));
    }

    Ok(token_data.claims.sub)
}

/// Authentication middleware that validates the token cookie
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract the raw Cookie header
    let cookie_header = request
        .headers()
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing auth cookie".into()))?;

    // Find the token cookie
    let token = token_from_cookie_header(cookie_header, &state.settings.auth.cookie_name)
        .ok_or_else(|| AppError::Unauthorized("Missing auth cookie".into()))?;

    // Decode and validate the token
    let username = verify_token(token, &state.settings.auth)?;

    // Insert authenticated user into request extensions
    request.extensions_mut().insert(AuthUser { username });

    // Continue to the next handler
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use test_case::test_case;

    fn settings() -> AuthSettings {
        AuthSettings {
            secret: "test-secret-that-is-at-least-32-bytes!".to_string(),
            cookie_name: "uuid".to_string(),
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test_case("uuid=abc123", Some("abc123") ; "single cookie")]
    #[test_case("theme=dark; uuid=abc123", Some("abc123") ; "second of two")]
    #[test_case("uuid=abc123; theme=dark", Some("abc123") ; "first of two")]
    #[test_case("uuid2=evil; uuid=abc123", Some("abc123") ; "prefix collision")]
    #[test_case("theme=dark", None ; "absent")]
    #[test_case("", None ; "empty header")]
    fn test_token_from_cookie_header(header: &str, expected: Option<&str>) {
        assert_eq!(token_from_cookie_header(header, "uuid"), expected);
    }

    #[test]
    fn test_verify_token_roundtrip() {
        let settings = settings();
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::minutes(5)).timestamp(),
        };

        let token = sign(&claims, &settings.secret);

        assert_eq!(verify_token(&token, &settings).unwrap(), "alice");
    }

    #[test]
    fn test_verify_token_rejects_wrong_secret() {
        let settings = settings();
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::minutes(5)).timestamp(),
        };

        let token = sign(&claims, "a-different-secret-of-sufficient-len");

        assert!(verify_token(&token, &settings).is_err());
    }

    #[test]
    fn test_verify_token_rejects_expired() {
        let settings = settings();
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (chrono::Utc::now() - chrono::Duration::minutes(5)).timestamp(),
        };

        let token = sign(&claims, &settings.secret);

        assert!(matches!(
            verify_token(&token, &settings),
            Err(AppError::Unauthorized(msg)) if msg == "Token expired"
        ));
    }

    #[test]
    fn test_verify_token_rejects_garbage() {
        assert!(verify_token("not-a-token", &settings()).is_err());
    }
}
