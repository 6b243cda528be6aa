use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// A job entry. Only `id` is interpreted; everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: Uuid,                     // unique user ID
    pub email: String,                // unique, normalised email
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub jobs: Json<Vec<Job>>,         // embedded, insertion ordered
    pub version: i64,                 // bumped on every jobs write
    pub created_at: OffsetDateTime,   // creation timestamp
}

impl UserRecord {
    pub fn new(email: &str, password_hash: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            jobs: Json(Vec::new()),
            version: 0,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs.0
    }

    pub fn jobs_mut(&mut self) -> &mut Vec<Job> {
        &mut self.jobs.0
    }
}
