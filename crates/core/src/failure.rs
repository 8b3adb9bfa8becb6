use serde_json::Value;
use serde_json::json;

/// Why a relayed call to the processing service did not produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    Timeout,
    Unreachable,
    Status(u16),
    Malformed,
    Cancelled,
}

/// Downstream failure, optionally carrying whatever the peer said about it.
#[derive(Debug, thiserror::Error)]
#[error("{}", self.message())]
pub struct Upstream {
    cause: Cause,
    detail: Option<Value>,
}

impl Upstream {
    pub fn new(cause: Cause) -> Self {
        Self {
            cause,
            detail: None,
        }
    }
    pub fn with_detail(self, detail: Value) -> Self {
        Self {
            detail: Some(detail),
            ..self
        }
    }
    /// Drops the downstream payload so it never reaches the caller.
    pub fn redacted(self) -> Self {
        Self {
            detail: None,
            ..self
        }
    }
    pub fn cause(&self) -> Cause {
        self.cause
    }
    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }
    pub fn message(&self) -> &'static str {
        match self.cause {
            Cause::Timeout => "AI processing timed out",
            _ => "AI processing failed",
        }
    }
}

/// Every way a gateway request can fail, as seen by the caller.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Email already in use")]
    DuplicateAccount,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidToken(&'static str),
    #[error("No file uploaded")]
    NoFileProvided,
    #[error(transparent)]
    Upstream(#[from] Upstream),
    #[error("Server error")]
    Internal(String),
}

impl Failure {
    pub fn internal(e: impl std::fmt::Display) -> Self {
        Self::Internal(e.to_string())
    }
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::DuplicateAccount => 400,
            Self::NoFileProvided => 400,
            Self::InvalidCredentials => 401,
            Self::InvalidToken(_) => 401,
            Self::Upstream(_) => 500,
            Self::Internal(_) => 500,
        }
    }
    /// JSON body returned to the caller. Internal details stay server-side.
    pub fn body(&self) -> Value {
        match self {
            Self::Upstream(upstream) => match upstream.detail() {
                Some(detail) => json!({ "message": upstream.message(), "error": detail }),
                None => json!({ "message": upstream.message() }),
            },
            other => json!({ "message": other.to_string() }),
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::*;
    use actix_web::HttpResponse;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    impl ResponseError for Failure {
        fn status_code(&self) -> StatusCode {
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
        fn error_response(&self) -> HttpResponse {
            match self {
                Self::Internal(detail) => log::error!("internal failure: {}", detail),
                Self::Upstream(upstream) => log::warn!(
                    "upstream failure ({:?}): {}",
                    upstream.cause(),
                    upstream.detail().map(Value::to_string).unwrap_or_default()
                ),
                other => log::debug!("rejected request: {}", other),
            }
            HttpResponse::build(self.status_code()).json(self.body())
        }
    }
}
