//! Error taxonomy shared by every core operation.

use crate::auth::AuthError;
use crate::logging::LoggingError;
use crate::model::todo::TodoValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure returned to the presentation layer.
#[derive(Debug)]
pub enum ServiceError {
    /// No resolvable caller; nothing was read or written.
    Unauthenticated,
    /// Input rejected before any storage write.
    InvalidArgument(String),
    /// Record absent or owned by another user. The two cases are not
    /// distinguishable to callers.
    NotFoundOrForbidden,
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Host logging configuration could not be applied.
    Logging(LoggingError),
}

impl ServiceError {
    /// Stable short code for logs and host-side mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFoundOrForbidden => "not_found_or_forbidden",
            Self::Repo(_) => "storage_failure",
            Self::Logging(_) => "logging_unavailable",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotFoundOrForbidden => write!(f, "record not found or access denied"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Logging(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Unauthenticated => Self::Unauthenticated,
        }
    }
}

impl From<LoggingError> for ServiceError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<TodoValidationError> for ServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFoundOrForbidden,
            RepoError::ForeignCategory(id) => {
                Self::InvalidArgument(format!("unknown category: {id}"))
            }
            other => Self::Repo(other),
        }
    }
}
