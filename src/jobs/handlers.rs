use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{DeletePayload, JobPayload},
    services,
};
use crate::{
    auth::{dto::Envelope, dto::normalize_email, middleware::{require_bearer, AuthEmail}},
    error::ApiError,
    extract::{ValidJson, ValidPath},
    state::AppState,
    users::Job,
};

pub fn job_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/jobs", post(add_job).put(update_job))
        // GET takes an email, POST a job id.
        .route("/jobs/:key", get(list_jobs).post(delete_job))
        .route_layer(middleware::from_fn_with_state(state, require_bearer))
}

#[instrument(skip(state, auth, body))]
pub async fn add_job(
    State(state): State<AppState>,
    auth: AuthEmail,
    ValidJson(body): ValidJson<Envelope<JobPayload>>,
) -> Result<&'static str, ApiError> {
    let payload = body.data.validated()?;
    let email = auth.inject(payload.email);

    services::add_job(state.store.as_ref(), &email, payload.job).await?;
    Ok("Job Added")
}

/// Only the owner of the token may list; the path email must match it.
#[instrument(skip(state, auth))]
pub async fn list_jobs(
    State(state): State<AppState>,
    auth: AuthEmail,
    ValidPath(email): ValidPath<String>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let email = normalize_email(&email);
    if email != auth.0 {
        warn!(requested = %email, token = %auth.0, "job listing for another user refused");
        return Err(ApiError::Forbidden);
    }

    let jobs = services::list_jobs(state.store.as_ref(), &email).await?;
    Ok(Json(jobs))
}

#[instrument(skip(state, auth, body))]
pub async fn update_job(
    State(state): State<AppState>,
    auth: AuthEmail,
    ValidJson(body): ValidJson<Envelope<JobPayload>>,
) -> Result<Json<&'static str>, ApiError> {
    let payload = body.data.validated()?;
    let email = auth.inject(payload.email);

    services::update_job(state.store.as_ref(), &email, payload.job).await?;
    Ok(Json("Job updated"))
}

#[instrument(skip(state, auth, body))]
pub async fn delete_job(
    State(state): State<AppState>,
    auth: AuthEmail,
    ValidPath(job_id): ValidPath<String>,
    ValidJson(body): ValidJson<Envelope<DeletePayload>>,
) -> Result<Json<&'static str>, ApiError> {
    let payload = body.data;
    let email = auth.inject(payload.email);

    services::delete_job(state.store.as_ref(), &email, &job_id).await?;
    Ok(Json("Job Deleted"))
}
