use lonb_core::{repositories::Error as RepoError, usecases::Error as UsecaseError};
use thiserror::Error;

pub use lonb_core::repositories;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> AppError {
        AppError::Business(UsecaseError::Repo(err))
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Business(#[from] UsecaseError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
