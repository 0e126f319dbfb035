use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

pub const TOKEN_DURATION_SECS: i64 = 24 * 3600;
pub const COOKIE_NAME: &str = "sessionId";
const ISSUER: &str = "storefront";

/// Claims carried by the session cookie.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// Signs and verifies session tokens (HS256).
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn create_token(&self, user_id: &str, email: &str) -> Result<String, DomainError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(TOKEN_DURATION_SECS);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign session token: {e}")))
    }

    /// Returns the claims if the token is valid and not expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims, DomainError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| DomainError::unauthorized(format!("Invalid session token: {e}")))
    }
}

/// Set-Cookie value carrying the session token.
pub fn session_cookie(token: &str) -> String {
    let secure = if cfg!(debug_assertions) {
        ""
    } else {
        "; Secure"
    };
    format!(
        "{COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={TOKEN_DURATION_SECS}{secure}"
    )
}

pub fn clear_session_cookie() -> String {
    format!("{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session token from a Cookie header.
pub fn parse_session_cookie(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|part| part.trim().strip_prefix(COOKIE_NAME))
        .filter_map(|rest| rest.strip_prefix('='))
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret-key")
    }

    #[test]
    fn token_carries_user() {
        let svc = service();
        let token = svc.create_token("user-1", "ada@example.com").unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, TOKEN_DURATION_SECS);
    }

    #[test]
    fn rejects_garbage_and_foreign_secret() {
        let svc = service();
        assert!(svc.verify_token("garbage").is_err());

        let other = JwtService::new("another-secret");
        let token = other.create_token("user-1", "ada@example.com").unwrap();
        let err = svc.verify_token(&token).unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn parse_cookie() {
        assert_eq!(parse_session_cookie("sessionId=abc; theme=dark"), Some("abc"));
        assert_eq!(parse_session_cookie("theme=dark; sessionId=abc"), Some("abc"));
        assert_eq!(parse_session_cookie("sessionId=; theme=dark"), None);
        assert_eq!(parse_session_cookie("theme=dark"), None);
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
        assert!(session_cookie("t").starts_with("sessionId=t;"));
    }
}
