//! Request gates for the auth chain.
//!
//! Protected routes run `require_bearer` as a route layer and then take an
//! [`AuthEmail`] argument, which verifies the token a second time and yields
//! the email the handler must act on.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::{
    auth::{
        claims::IdentityClaims, dto::Credentials, jwt::JwtKeys, password::verify_password_async,
    },
    error::ApiError,
    state::AppState,
    users::{UserRecord, UserStore},
};

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingOrMalformedHeader)?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(ApiError::MissingOrMalformedHeader),
    }
}

fn verify_identity(keys: &JwtKeys, headers: &HeaderMap) -> Result<IdentityClaims, ApiError> {
    let token = bearer_token(headers)?;
    keys.verify::<IdentityClaims>(token).map_err(|e| {
        warn!(error = %e, "token rejected");
        ApiError::InvalidToken
    })
}

/// Look the user up and check the password. Returns the loaded record so
/// the caller does not have to fetch it again.
pub async fn validate_password(
    store: &dyn UserStore,
    creds: &Credentials,
) -> Result<UserRecord, ApiError> {
    let user = store
        .find_by_email(&creds.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %creds.email, "login unknown email");
            ApiError::UserNotFound
        })?;

    let ok = verify_password_async(creds.password.clone(), user.password_hash.clone()).await?;
    if !ok {
        warn!(email = %creds.email, "login invalid password");
        return Err(ApiError::PasswordMismatch);
    }
    Ok(user)
}

/// Route layer: reject the request unless it carries a valid bearer token.
/// The decoded claims are dropped.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    verify_identity(&state.jwt, request.headers())?;
    Ok(next.run(request).await)
}

/// Email taken from a freshly verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthEmail(pub String);

impl AuthEmail {
    /// Replace a client supplied email with the authenticated one and
    /// return the email to act on.
    pub fn inject(self, claimed: Option<String>) -> String {
        if let Some(c) = claimed.as_deref() {
            if c != self.0 {
                warn!(claimed = %c, token = %self.0, "body email differs from token, ignored");
            }
        }
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthEmail
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = verify_identity(&keys, &parts.headers)?;
        debug!(email = %claims.email, "identity injected");
        Ok(AuthEmail(claims.email))
    }
}
