use thiserror::Error;

use crate::repository::RepositoryError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not authorized to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Submitted data was rejected; the message is shown to the user.
    #[error("{0}")]
    Form(String),
    /// A value failed a domain constraint.
    #[error("{0}")]
    TypeConstraint(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Map a failed write, keeping constraint violations user-facing.
    pub fn from_write(err: RepositoryError, context: &str) -> Self {
        match err {
            RepositoryError::ConstraintViolation(message) => {
                log::warn!("{context}: {message}");
                ServiceError::Form(format!("{context}: {message}"))
            }
            RepositoryError::NotFound => ServiceError::NotFound,
            err => {
                log::error!("{context}: {err}");
                ServiceError::Internal
            }
        }
    }
}
