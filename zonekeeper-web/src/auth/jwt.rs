//! JWT authentication implementation based on Axum official examples
//!
//! Tokens carry the caller's identity, role, and permission set plus a
//! unique `jti`. Verification checks signature and expiry, then consults the
//! revocation ledger: a logged-out token is rejected even before its natural
//! expiry.

use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;
use tracing::{debug, warn};
use zonekeeper_applications::operations::auth::AuthenticatedUser;
use zonekeeper_applications::{CallerClaims, Permission};

/// Access tokens expire after this many minutes
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// JWT signing keys - initialized from environment variable
static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = std::env::var("ZONEKEEPER_JWT_SECRET")
        .unwrap_or_else(|_| "zonekeeper-default-secret-change-in-production".to_string());
    Keys::new(secret.as_bytes())
});

/// JWT signing and verification keys
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Role name
    pub role: String,
    /// Permission tokens granted by the role
    pub permissions: Vec<String>,
    /// Unique token id, keyed by the revocation ledger
    pub jti: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a freshly authenticated account
    pub fn new_access_token(auth: &AuthenticatedUser) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES);

        Self {
            sub: auth.user.username.clone(),
            role: auth.role.name.clone(),
            permissions: auth.role.permissions.iter().map(|p| p.to_string()).collect(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Convert the embedded claims into the caller identity the application
    /// layer works with
    pub fn to_caller_claims(&self) -> Result<CallerClaims, AuthError> {
        let permissions: Result<Vec<Permission>, _> = self
            .permissions
            .iter()
            .map(|p| p.parse::<Permission>())
            .collect();

        let permissions = permissions.map_err(|_| AuthError::InvalidPermissions)?;
        Ok(CallerClaims::new(
            self.sub.clone(),
            self.role.clone(),
            permissions,
        ))
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Token-path authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token has been revoked")]
    TokenRevoked,
    #[error("Invalid permissions")]
    InvalidPermissions,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Revocation check failed")]
    RevocationCheck,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            AuthError::MissingAuthHeader => (
                StatusCode::UNAUTHORIZED,
                "missing_auth_header",
                "Authorization header is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or malformed token",
            ),
            AuthError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "Token has expired",
            ),
            AuthError::TokenRevoked => (
                StatusCode::UNAUTHORIZED,
                "token_revoked",
                "Token has been revoked",
            ),
            AuthError::InvalidPermissions => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_permissions",
                "Invalid permission format",
            ),
            AuthError::TokenCreation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_creation_failed",
                "Failed to create authentication token",
            ),
            AuthError::RevocationCheck => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Failed to verify token revocation state",
            ),
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// JWT token utilities
pub struct JwtService;

impl JwtService {
    /// Mint a signed access token for an authenticated account
    pub fn generate_access_token(auth: &AuthenticatedUser) -> Result<(String, Claims), AuthError> {
        let claims = Claims::new_access_token(auth);
        let token = encode(&Header::default(), &claims, &KEYS.encoding).map_err(|e| {
            warn!("Failed to encode JWT token: {}", e);
            AuthError::TokenCreation
        })?;
        Ok((token, claims))
    }

    /// Verify signature and expiry and decode the claims. Revocation is
    /// checked separately against the ledger.
    pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &KEYS.decoding, &Validation::default())
            .map_err(|e| {
                debug!("Token verification failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        let claims = token_data.claims;
        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

/// FromRequestParts implementation for Claims (JWT extraction)
///
/// A token is accepted only if signature and expiry check out AND its id is
/// absent from the revocation ledger.
impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get("authorization")
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = JwtService::verify_token(token)?;

        let revoked = app_state
            .store
            .is_jti_revoked(&claims.jti)
            .await
            .map_err(|e| {
                warn!("Revocation ledger lookup failed: {}", e);
                AuthError::RevocationCheck
            })?;

        if revoked {
            debug!("Rejected revoked token {}", claims.jti);
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }
}
