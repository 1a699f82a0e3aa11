use super::json_error_response;
use lonb_application::error::AppError;
pub use lonb_core::{repositories::Error as RepoError, usecases::Error as ParameterError};
use rocket::{
    self,
    http::Status,
    response::{self, Responder},
    serde::json::Error as JsonError,
};
use std::io;
use thiserror::Error;

/// Message of server errors without a more specific description.
pub const SERVER_ERROR: &str = "Server error";

#[derive(Debug, Error)]
#[allow(clippy::large_enum_variant)]
pub enum Error {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("{1}")]
    WithStatus(Status, String),
    /// A server error reported with a fixed message.
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::WithStatus(Status::BadRequest, message.into())
    }

    pub fn status(&self) -> Status {
        match self {
            Self::App(AppError::Business(err)) => match err {
                ParameterError::LocationNotFound
                | ParameterError::PhotoNotFound
                | ParameterError::Repo(RepoError::NotFound) => Status::NotFound,
                ParameterError::Repo(_) => Status::InternalServerError,
                _ => Status::BadRequest,
            },
            Self::WithStatus(status, _) => *status,
            Self::App(AppError::Other(_)) | Self::Internal { .. } | Self::Other(_) => {
                Status::InternalServerError
            }
        }
    }

    /// Replaces the message of server errors.
    pub fn on_server_error(self, message: &'static str) -> Self {
        if self.status() != Status::InternalServerError {
            return self;
        }
        match self {
            Self::Internal { source, .. } => Self::Internal { message, source },
            err => Self::Internal {
                message,
                source: err.into(),
            },
        }
    }
}

pub trait OnServerError<T> {
    fn on_server_error(self, message: &'static str) -> Result<T, Error>;
}

impl<T, E> OnServerError<T> for Result<T, E>
where
    E: Into<Error>,
{
    fn on_server_error(self, message: &'static str) -> Result<T, Error> {
        self.map_err(|err| Into::<Error>::into(err).on_server_error(message))
    }
}

impl From<JsonError<'_>> for Error {
    fn from(err: JsonError) -> Self {
        match err {
            JsonError::Io(err) => Self::bad_request(format!("Unable to read request body: {err}")),
            JsonError::Parse(_str, err) => Self::bad_request(format!("Invalid JSON: {err}")),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Other(err.into())
    }
}

impl From<ParameterError> for Error {
    fn from(err: ParameterError) -> Self {
        Self::App(err.into())
    }
}

impl From<RepoError> for Error {
    fn from(err: RepoError) -> Self {
        AppError::from(err).into()
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> response::Result<'o> {
        let status = self.status();
        match self {
            Error::Internal { message, source } => {
                error!("{message}: {source:#}");
                json_error_response(req, message, Some(format!("{source:#}")), status)
            }
            err if status == Status::InternalServerError => {
                error!("{err:#}");
                json_error_response(req, SERVER_ERROR, Some(format!("{err:#}")), status)
            }
            err => json_error_response(req, &err.to_string(), None, status),
        }
    }
}
