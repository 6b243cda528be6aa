use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Request bodies arrive wrapped as `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Body of `/signup` and `/login`.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Signup form: trim and lowercase the email, then check both fields.
    pub fn normalized(self) -> Result<Self, ApiError> {
        let creds = self.normalized_for_login()?;
        if !is_valid_email(&creds.email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
        Ok(creds)
    }

    /// Login form: the email only has to identify a stored user, so its
    /// format is not checked; an unknown one ends as `UserNotFound`.
    pub fn normalized_for_login(mut self) -> Result<Self, ApiError> {
        self.email = normalize_email(&self.email);
        if self.password.is_empty() {
            return Err(ApiError::Validation("Password is required".into()));
        }
        Ok(self)
    }
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}
