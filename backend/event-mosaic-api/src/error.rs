/// Error types for the Event Mosaic API
///
/// `AppError` is what services and repositories return. `ApiError` pairs it with
/// the request path at the HTTP boundary so the shared `ErrorResponse` body can
/// be rendered.
use actix_web::{error::ResponseError, http::StatusCode, HttpRequest, HttpResponse};
use error_types::ErrorResponse;
use std::fmt;

/// Result type for Event Mosaic API operations
pub type Result<T> = std::result::Result<T, AppError>;

const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Requested event does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request failed declarative validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A parameter passed validation but could not be converted
    #[error("{0}")]
    InvalidParameter(String),

    /// Malformed request (query string, path segment)
    #[error("{0}")]
    BadRequest(String),

    /// Elasticsearch failed or answered unexpectedly
    #[error("Search backend error: {0}")]
    SearchBackend(String),

    /// Configuration is missing or out of range
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidParameter(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::SearchBackend(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to API clients; server-side details stay in logs
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<elasticsearch::Error> for AppError {
    fn from(err: elasticsearch::Error) -> Self {
        AppError::SearchBackend(err.to_string())
    }
}

impl From<elasticsearch::http::transport::BuildError> for AppError {
    fn from(err: elasticsearch::http::transport::BuildError) -> Self {
        AppError::Config(format!("failed to build Elasticsearch transport: {err}"))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("invalid URL: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<envy::Error> for AppError {
    fn from(err: envy::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(crate::validation::describe(&errors))
    }
}

/// `AppError` bound to the request it failed
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    path: String,
}

impl ApiError {
    pub fn new(error: AppError, req: &HttpRequest) -> Self {
        Self {
            error,
            path: req.path().to_string(),
        }
    }

    pub fn inner(&self) -> &AppError {
        &self.error
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.path)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(path = %self.path, error = %self.error, "request failed");
        } else {
            tracing::warn!(path = %self.path, status = status.as_u16(), error = %self.error, "request rejected");
        }

        let body = ErrorResponse::new(status.as_u16(), self.error.public_message(), &self.path);
        HttpResponse::build(status).json(body)
    }
}
