//! Amazon ECR implementation of [`Registry`]

use super::{classify, classify_failure, ImageDetail, ImageRecord, Operation, Registry};
use crate::{RetagError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ecr::error::ProvideErrorMetadata;
use aws_sdk_ecr::operation::batch_delete_image::BatchDeleteImageOutput;
use aws_sdk_ecr::operation::batch_get_image::BatchGetImageOutput;
use aws_sdk_ecr::operation::describe_images::DescribeImagesOutput;
use aws_sdk_ecr::types::{ImageFailure, ImageIdentifier};
use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::{debug, info, warn};

/// Credential profile and region a session is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub profile: String,
    pub region: String,
}

/// Authenticated ECR client, created once per invocation
pub struct EcrSession {
    client: aws_sdk_ecr::Client,
}

impl EcrSession {
    /// Build a session using the standard AWS credential resolution chain
    pub async fn connect(config: &SessionConfig) -> Self {
        debug!(profile = %config.profile, region = %config.region, "loading AWS configuration");

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&config.profile)
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self {
            client: aws_sdk_ecr::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl Registry for EcrSession {
    async fn fetch_image_by_digest(&self, repository: &str, digest: &str) -> Result<ImageRecord> {
        info!(repository, digest, "fetching image manifest");

        let output = self
            .client
            .batch_get_image()
            .repository_name(repository)
            .image_ids(ImageIdentifier::builder().image_digest(digest).build())
            .send()
            .await
            .map_err(|err| classify(Operation::FetchImage, &err))?;

        image_from_output(&output, digest)
    }

    async fn delete_tag(&self, repository: &str, tag: &str) -> Result<()> {
        info!(repository, tag, "removing tag");

        let output = self
            .client
            .batch_delete_image()
            .repository_name(repository)
            .image_ids(ImageIdentifier::builder().image_tag(tag).build())
            .send()
            .await
            .map_err(|err| classify(Operation::DeleteTag, &err))?;

        ignore_delete_failures(&output, tag);
        Ok(())
    }

    async fn put_tag(&self, repository: &str, tag: &str, image: &ImageRecord) -> Result<()> {
        info!(repository, tag, digest = %image.digest, "applying tag");

        self.client
            .put_image()
            .repository_name(repository)
            .image_tag(tag)
            .image_manifest(&image.manifest)
            .set_image_manifest_media_type(image.media_type.clone())
            .image_digest(&image.digest)
            .send()
            .await
            .map_err(|err| classify(Operation::PutTag, &err))?;

        Ok(())
    }

    async fn list_images(&self, repository: &str) -> Result<Vec<ImageDetail>> {
        let details = collect_pages(|next_token| {
            self.client
                .describe_images()
                .repository_name(repository)
                .set_next_token(next_token)
                .send()
        })
        .await?;

        debug!(repository, count = details.len(), "listed images");
        Ok(details)
    }
}

/// Pick the requested image out of a batch-get response
fn image_from_output(output: &BatchGetImageOutput, digest: &str) -> Result<ImageRecord> {
    let Some(image) = output.images().first() else {
        return Err(match output.failures().first() {
            Some(failure) => failure_error(Operation::FetchImage, failure),
            None => RetagError::UnexpectedResponse {
                operation: Operation::FetchImage,
                reason: format!("no image returned for {}", digest),
            },
        });
    };

    let returned = image.image_id().and_then(|id| id.image_digest());
    if let Some(returned) = returned {
        if returned != digest {
            return Err(RetagError::UnexpectedResponse {
                operation: Operation::FetchImage,
                reason: format!("asked for {} but got {}", digest, returned),
            });
        }
    }

    let manifest = image
        .image_manifest()
        .ok_or_else(|| RetagError::UnexpectedResponse {
            operation: Operation::FetchImage,
            reason: format!("image {} has no manifest", digest),
        })?;

    Ok(ImageRecord {
        digest: digest.to_string(),
        manifest: manifest.to_string(),
        media_type: image.image_manifest_media_type().map(String::from),
    })
}

/// Log the outcome of a batch delete, returning how many failures were ignored
fn ignore_delete_failures(output: &BatchDeleteImageOutput, tag: &str) -> usize {
    for id in output.image_ids() {
        debug!(digest = id.image_digest().unwrap_or("<none>"), tag, "tag removed from image");
    }

    // A tag held by no image shows up here, not as an error.
    for failure in output.failures() {
        warn!(
            tag,
            code = failure.failure_code().map(|c| c.as_str()).unwrap_or("<none>"),
            reason = failure.failure_reason().unwrap_or(""),
            "tag was not removed from an image"
        );
    }

    output.failures().len()
}

/// Follow `next_token` until the listing is exhausted
async fn collect_pages<F, Fut, E>(mut fetch_page: F) -> Result<Vec<ImageDetail>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = std::result::Result<DescribeImagesOutput, E>>,
    E: ProvideErrorMetadata + std::error::Error,
{
    let mut details = Vec::new();
    let mut next_token = None;

    loop {
        let output = fetch_page(next_token.take())
            .await
            .map_err(|err| classify(Operation::ListImages, &err))?;

        details.extend(output.image_details().iter().filter_map(|detail| {
            Some(ImageDetail {
                digest: detail.image_digest()?.to_string(),
                tags: detail.image_tags().to_vec(),
                pushed_at: detail
                    .image_pushed_at()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos())),
            })
        }));

        match output.next_token() {
            Some(token) => next_token = Some(token.to_string()),
            None => break,
        }
    }

    Ok(details)
}

fn failure_error(operation: Operation, failure: &ImageFailure) -> RetagError {
    classify_failure(
        operation,
        failure.failure_code().map(|c| c.as_str()),
        failure.failure_reason(),
    )
}
