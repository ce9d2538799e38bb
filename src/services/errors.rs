use thiserror::Error;
use validator::ValidationError;

use crate::forms::products::{ProductFormError, validation_message};
use crate::repository::errors::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the product workflows.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    InvalidInput(String),
    /// The referenced product does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The write would break the code uniqueness rule.
    #[error("{0}")]
    Conflict(String),
    /// Storage failure the caller cannot correct.
    #[error("{0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound("record not found".to_string()),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<diesel::result::Error> for ServiceError {
    fn from(value: diesel::result::Error) -> Self {
        RepositoryError::from(value).into()
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        ServiceError::InvalidInput(validation_message(&value))
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(value: ProductFormError) -> Self {
        match value {
            ProductFormError::Invalid(message) => ServiceError::InvalidInput(message),
            missing @ ProductFormError::MissingColumn(_) => {
                ServiceError::Internal(missing.to_string())
            }
        }
    }
}
