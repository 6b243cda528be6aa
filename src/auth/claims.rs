use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// JWT payload identifying the bearer. Carries no expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub email: String, // normalised user email
    pub iat: usize,    // issued at (unix timestamp)
}

impl IdentityClaims {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            iat: OffsetDateTime::now_utc().unix_timestamp() as usize,
        }
    }
}
