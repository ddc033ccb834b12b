//! Repository listing ordered by push time
//!
//! Not used when retagging. Kept as a standalone capability for callers that
//! want to see which image is newest before picking a digest.

use super::{ImageDetail, Registry};
use crate::Result;
use chrono::{DateTime, Utc};

/// Label for images that carry no tag
pub const UNTAGGED: &str = "untagged";

/// One image in a push-time ordered listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub digest: String,
    /// First tag of the image, or [`UNTAGGED`]
    pub tag: String,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl From<ImageDetail> for ImageSummary {
    fn from(detail: ImageDetail) -> Self {
        let tag = detail
            .tags
            .into_iter()
            .next()
            .unwrap_or_else(|| UNTAGGED.to_string());

        Self {
            digest: detail.digest,
            tag,
            pushed_at: detail.pushed_at,
        }
    }
}

/// Summarize `details`, oldest push first
///
/// Images without a push time sort ahead of everything else. Ties keep the
/// order the registry returned them in.
pub fn order_by_push_time(details: Vec<ImageDetail>) -> Vec<ImageSummary> {
    let mut summaries: Vec<ImageSummary> = details.into_iter().map(ImageSummary::from).collect();
    summaries.sort_by_key(|summary| summary.pushed_at);
    summaries
}

/// List every image in `repository`, oldest push first
pub async fn images_by_push_time<R: Registry + ?Sized>(
    registry: &R,
    repository: &str,
) -> Result<Vec<ImageSummary>> {
    let details = registry.list_images(repository).await?;
    Ok(order_by_push_time(details))
}
