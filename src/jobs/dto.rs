use serde::Deserialize;

use crate::{error::ApiError, users::Job};

/// Body of `POST /jobs` and `PUT /jobs`. `email` is whatever the client sent;
/// it is overwritten from the token before use.
#[derive(Debug, Deserialize)]
pub struct JobPayload {
    #[serde(default)]
    pub email: Option<String>,
    pub job: Job,
}

impl JobPayload {
    pub fn validated(self) -> Result<Self, ApiError> {
        if self.job.id.trim().is_empty() {
            return Err(ApiError::Validation("job.id is required".into()));
        }
        Ok(self)
    }
}

/// Body of `POST /jobs/:jid`.
#[derive(Debug, Default, Deserialize)]
pub struct DeletePayload {
    #[serde(default)]
    pub email: Option<String>,
}
