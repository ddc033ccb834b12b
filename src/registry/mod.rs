//! Remote registry collaborator
//!
//! Everything the retag flow needs from a registry goes through the
//! [`Registry`] trait. [`ecr::EcrSession`] is the production implementation.

pub mod ecr;
pub mod error;
pub mod listing;

#[cfg(test)]
pub(crate) mod fake;

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

pub use ecr::{EcrSession, SessionConfig};
pub use error::{classify, classify_failure, ErrorKind};

/// An image fetched by digest, consumed by the attach step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub digest: String,
    /// Manifest exactly as the registry returned it
    pub manifest: String,
    pub media_type: Option<String>,
}

/// One entry of a repository listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetail {
    pub digest: String,
    pub tags: Vec<String>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Remote calls issued against a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchImage,
    DeleteTag,
    PutTag,
    ListImages,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchImage => "fetch image by digest",
            Self::DeleteTag => "delete tag",
            Self::PutTag => "put tag",
            Self::ListImages => "list images",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry control plane operations
#[async_trait]
pub trait Registry: Send + Sync {
    /// Resolve a digest to the image manifest stored under it
    async fn fetch_image_by_digest(&self, repository: &str, digest: &str) -> Result<ImageRecord>;

    /// Remove `tag` from whichever image in `repository` carries it
    async fn delete_tag(&self, repository: &str, tag: &str) -> Result<()>;

    /// Point `tag` at the image described by `image`
    async fn put_tag(&self, repository: &str, tag: &str, image: &ImageRecord) -> Result<()>;

    /// List every image in `repository`
    async fn list_images(&self, repository: &str) -> Result<Vec<ImageDetail>>;
}
