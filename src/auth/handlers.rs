use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        claims::IdentityClaims,
        dto::{Credentials, Envelope, TokenResponse},
        middleware::validate_password,
        password::hash_password_async,
    },
    error::ApiError,
    extract::ValidJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Create a user with an empty job list. A taken email is reported by the
/// store's uniqueness check, not looked up beforehand.
#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<Envelope<Credentials>>,
) -> Result<&'static str, ApiError> {
    let creds = body.data.normalized()?;

    let hash = hash_password_async(creds.password).await?;
    let user = state.store.create(&creds.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok("user created")
}

/// Check the password, then sign a token over the email only.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<Envelope<Credentials>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let creds = body.data.normalized_for_login()?;
    let user = validate_password(state.store.as_ref(), &creds).await?;

    let token = state
        .jwt
        .issue(&IdentityClaims::new(&user.email))
        .map_err(|e| {
            error!(error = %e, "jwt sign failed");
            ApiError::Internal(e.into())
        })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse { token }))
}
