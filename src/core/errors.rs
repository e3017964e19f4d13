//! Service level errors

use crate::infrastructure::mailer::MailerError;
use crate::infrastructure::subscribers::StoreError;
use crate::infrastructure::traits::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller sent something unusable. The message is safe to show to the client.
    #[error("{0}")]
    Validation(String),

    #[error("This time slot is no longer available")]
    SlotUnavailable,

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to render email: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Mailer(#[from] MailerError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Whether the failure was caused by the request rather than by a backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_) | ServiceError::SlotUnavailable
        )
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::SlotTaken => ServiceError::SlotUnavailable,
            RepositoryError::UnknownCoach => {
                ServiceError::validation("Selected coach does not exist")
            }
            e => ServiceError::Repository(e),
        }
    }
}
