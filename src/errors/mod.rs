use thiserror::Error;

use crate::allocation::AllocationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        ServiceError::Rejected(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
