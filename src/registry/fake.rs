//! In-memory registry used by unit tests

use super::{ErrorKind, ImageDetail, ImageRecord, Operation, Registry};
use crate::{RetagError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch { repository: String, digest: String },
    Delete { repository: String, tag: String },
    Put { repository: String, tag: String, manifest: String },
    List { repository: String },
}

#[derive(Default)]
pub struct FakeRegistry {
    pub images: Vec<ImageRecord>,
    pub details: Vec<ImageDetail>,
    pub fail_on: Option<(Operation, ErrorKind)>,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl FakeRegistry {
    pub fn with_image(digest: &str, manifest: &str) -> Self {
        Self {
            images: vec![ImageRecord {
                digest: digest.to_string(),
                manifest: manifest.to_string(),
                media_type: None,
            }],
            ..Default::default()
        }
    }

    pub fn failing(mut self, operation: Operation, kind: ErrorKind) -> Self {
        self.fail_on = Some((operation, kind));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, operation: Operation) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_on {
            Some((failing, kind)) if *failing == operation => Err(RetagError::Registry {
                operation,
                kind: kind.clone(),
                message: "injected failure".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn fetch_image_by_digest(&self, repository: &str, digest: &str) -> Result<ImageRecord> {
        self.record(
            Call::Fetch {
                repository: repository.to_string(),
                digest: digest.to_string(),
            },
            Operation::FetchImage,
        )?;

        self.images
            .iter()
            .find(|image| image.digest == digest)
            .cloned()
            .ok_or_else(|| RetagError::Registry {
                operation: Operation::FetchImage,
                kind: ErrorKind::Unclassified(Some("ImageNotFound".to_string())),
                message: "Requested image not found".to_string(),
            })
    }

    async fn delete_tag(&self, repository: &str, tag: &str) -> Result<()> {
        self.record(
            Call::Delete {
                repository: repository.to_string(),
                tag: tag.to_string(),
            },
            Operation::DeleteTag,
        )
    }

    async fn put_tag(&self, repository: &str, tag: &str, image: &ImageRecord) -> Result<()> {
        self.record(
            Call::Put {
                repository: repository.to_string(),
                tag: tag.to_string(),
                manifest: image.manifest.clone(),
            },
            Operation::PutTag,
        )
    }

    async fn list_images(&self, repository: &str) -> Result<Vec<ImageDetail>> {
        self.record(
            Call::List {
                repository: repository.to_string(),
            },
            Operation::ListImages,
        )?;
        Ok(self.details.clone())
    }
}
