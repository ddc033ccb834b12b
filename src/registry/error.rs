//! Classification of registry failures

use super::Operation;
use crate::RetagError;
use aws_sdk_ecr::error::{DisplayErrorContext, ProvideErrorMetadata};
use std::fmt;

/// Flat taxonomy of remote-call failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Server,
    InvalidParameter,
    RepositoryNotFound,
    /// Anything else, with the remote code when there was one
    Unclassified(Option<String>),
}

impl ErrorKind {
    /// Map a remote error code onto the taxonomy
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("ServerException") => Self::Server,
            Some("InvalidParameterException" | "InvalidImageDigest" | "InvalidImageTag") => {
                Self::InvalidParameter
            }
            Some("RepositoryNotFoundException") => Self::RepositoryNotFound,
            other => Self::Unclassified(other.map(str::to_string)),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Server => "ServerException",
            Self::InvalidParameter => "InvalidParameterException",
            Self::RepositoryNotFound => "RepositoryNotFoundException",
            Self::Unclassified(Some(code)) => code,
            Self::Unclassified(None) => "UnclassifiedError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an SDK error raised by `operation`
///
/// Service errors are keyed on their error code. Transport and credential
/// failures carry no code and end up as [`ErrorKind::Unclassified`].
pub fn classify<E>(operation: Operation, err: &E) -> RetagError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let kind = ErrorKind::from_code(err.code());
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(err).to_string(),
    };

    RetagError::Registry {
        operation,
        kind,
        message,
    }
}

/// Classify a per-image failure reported inside a successful batch response
pub fn classify_failure(operation: Operation, code: Option<&str>, reason: Option<&str>) -> RetagError {
    RetagError::Registry {
        operation,
        kind: ErrorKind::from_code(code),
        message: reason.unwrap_or("no reason given").to_string(),
    }
}
