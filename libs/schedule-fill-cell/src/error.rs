use thiserror::Error;

use shared_gateway::GatewayError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ScheduleFillError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Proposed start is not a valid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Deep link does not carry a provider id: {0}")]
    UnparseableLink(String),

    #[error("Target date did not normalize to YYYY-MM-DD: {0}")]
    InvalidDateFormat(String),

    #[error("No internal provider found for external id: {0}")]
    UnresolvedProvider(String),
}

impl From<GatewayError> for ScheduleFillError {
    fn from(err: GatewayError) -> Self {
        ScheduleFillError::Transport(err.user_message())
    }
}

impl From<ScheduleFillError> for AppError {
    fn from(err: ScheduleFillError) -> Self {
        match err {
            ScheduleFillError::Validation(msg) => AppError::ValidationError(msg),
            ScheduleFillError::Transport(msg) => AppError::ExternalService(msg),
            ScheduleFillError::UnresolvedProvider(msg) => AppError::NotFound(msg),
            ScheduleFillError::InvalidTimestamp(_)
            | ScheduleFillError::UnparseableLink(_)
            | ScheduleFillError::InvalidDateFormat(_) => AppError::BadRequest(err.to_string()),
        }
    }
}
