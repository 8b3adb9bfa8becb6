use folio_core::Failure;
use serde::Deserialize;
use serde::Serialize;

/// Missing fields deserialize to `None` so they surface as validation
/// failures rather than body-parse errors.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl SignupRequest {
    pub fn new(email: &str, first_name: &str, last_name: &str, password: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            password: Some(password.to_string()),
        }
    }
    /// (email, first name, last name, password), all present and non-blank.
    pub fn required(&self) -> Result<(&str, &str, &str, &str), Failure> {
        match (
            present(&self.email),
            present(&self.first_name),
            present(&self.last_name),
            secret(&self.password),
        ) {
            (Some(e), Some(f), Some(l), Some(p)) => Ok((e, f, l, p)),
            _ => Err(Failure::Validation("All fields are required")),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }
    pub fn required(&self) -> Result<(&str, &str), Failure> {
        match (present(&self.email), secret(&self.password)) {
            (Some(e), Some(p)) => Ok((e, p)),
            _ => Err(Failure::Validation("Email and password required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dev: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Passwords are taken verbatim; only emptiness disqualifies them.
fn secret(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
