use salvo::http::StatusCode;
use salvo::writing::Json;
use serde::Serialize;
use thiserror::Error;

use milonga_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] milonga_core::error::CoreError),

    /// A path, query or body parameter could not be read.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    /// ## Summary
    /// HTTP status reported for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::ServiceError(ServiceError::ValidationError(_) | ServiceError::InvalidQuery(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::ServiceError(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::ServiceError(ServiceError::SearchError(_)) => StatusCode::BAD_GATEWAY,
            Self::ServiceError(ServiceError::DatabaseError(_) | ServiceError::CoreError(_))
            | Self::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// ## Summary
    /// Writes this error to the response as a JSON body with the matching status.
    ///
    /// Server-side failures are logged and their details withheld from the caller.
    pub fn render(&self, res: &mut salvo::Response) {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
            status
                .canonical_reason()
                .unwrap_or("Internal server error")
                .to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            self.to_string()
        };

        res.status_code(status);
        res.render(Json(ErrorResponse { error: message }));
    }
}
