//! The retag flow: resolve the destination, drop the tag, reapply it

pub mod state;

use crate::registry::{Registry, SessionConfig};
use crate::{RetagError, Result};
use state::Stage;
use tracing::{debug, error};

/// Validated inputs of one retag run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetagRequest {
    tag: String,
    digest: String,
    profile: String,
    region: String,
    repository: String,
}

impl RetagRequest {
    /// Build a request, rejecting any empty value
    ///
    /// Values are checked for presence only. Digest and tag formats are left
    /// for the registry to judge.
    pub fn new(
        tag: impl Into<String>,
        digest: impl Into<String>,
        profile: impl Into<String>,
        region: impl Into<String>,
        repository: impl Into<String>,
    ) -> Result<Self> {
        let request = Self {
            tag: tag.into(),
            digest: digest.into(),
            profile: profile.into(),
            region: region.into(),
            repository: repository.into(),
        };

        for (flag, value) in [
            ("tag-name", &request.tag),
            ("new-image-digest", &request.digest),
            ("profile", &request.profile),
            ("region", &request.region),
            ("ecr-repo", &request.repository),
        ] {
            if value.is_empty() {
                return Err(RetagError::MissingInput(flag));
            }
        }

        debug!(stage = %Stage::Validated, "retag request accepted");
        Ok(request)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Session settings for this request
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            profile: self.profile.clone(),
            region: self.region.clone(),
        }
    }
}

/// Result of a completed retag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetagOutcome {
    pub tag: String,
    pub digest: String,
    /// Last stage reached by the flow
    pub stage: Stage,
}

impl RetagOutcome {
    /// Human readable summary printed on success
    pub fn report(&self) -> String {
        format!(
            "Retag success. The '{tag}' tag is now applied to an image with {digest} digest.\n\
             Please restart your AWS ECS services now. Otherwise, they will continue running on the old '{tag}' image.",
            tag = self.tag,
            digest = self.digest,
        )
    }
}

/// Move `request.tag` onto the image identified by `request.digest`
///
/// Calls are strictly ordered: fetch, delete, put. The first failure aborts
/// the run. Nothing is rolled back, so a failed put leaves the tag detached.
pub async fn retag<R: Registry + ?Sized>(registry: &R, request: &RetagRequest) -> Result<RetagOutcome> {
    let mut stage = Stage::SessionReady;

    let image = registry
        .fetch_image_by_digest(&request.repository, &request.digest)
        .await
        .map_err(|err| failed(stage, request, err))?;
    stage = advance(stage);

    registry
        .delete_tag(&request.repository, &request.tag)
        .await
        .map_err(|err| failed(stage, request, err))?;
    stage = advance(stage);

    registry
        .put_tag(&request.repository, &request.tag, &image)
        .await
        .map_err(|err| failed(stage, request, err))?;
    stage = advance(stage);

    Ok(RetagOutcome {
        tag: request.tag.clone(),
        digest: request.digest.clone(),
        stage,
    })
}

fn advance(stage: Stage) -> Stage {
    let next = stage.next().unwrap_or(stage);
    debug!(from = %stage, to = %next, "retag stage reached");
    next
}

fn failed(stage: Stage, request: &RetagRequest, err: RetagError) -> RetagError {
    debug!(from = %stage, to = %Stage::Failed, error = %err, "retag failed");
    if stage.leaves_tag_unbound() {
        error!(
            tag = %request.tag,
            repository = %request.repository,
            "tag was removed but not reapplied; it currently points at no image"
        );
    }
    err
}
