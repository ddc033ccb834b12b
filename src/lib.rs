//! ecr-image-retag - move an ECR tag onto a different image
//!
//! The tag is deleted from whichever image currently holds it and then
//! attached to the image identified by a content digest.

pub mod cli;
pub mod registry;
pub mod retag;

use registry::{ErrorKind, Operation};
use thiserror::Error;

/// Main error type for retag operations
#[derive(Error, Debug)]
pub enum RetagError {
    #[error("required flag --{0} is missing or empty")]
    MissingInput(&'static str),

    #[error("{operation} failed: {kind}: {message}")]
    Registry {
        operation: Operation,
        kind: ErrorKind,
        message: String,
    },

    #[error("{operation} returned an unexpected response: {reason}")]
    UnexpectedResponse { operation: Operation, reason: String },
}

impl RetagError {
    /// Category of a remote failure, if this is one
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Registry { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RetagError>;

/// Application name
pub const APP_NAME: &str = "ecr-image-retag";
